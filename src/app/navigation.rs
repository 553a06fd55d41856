//! Navigation seam
//!
//! The core never renders; it only asks its host to move to another route.

/// Screens the flow can hand control to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    AddVehicle,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::AddVehicle => "/add-vehicle",
            Route::Dashboard => "/dashboard",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Host navigation, fire-and-forget from the core's point of view
pub trait Navigator {
    fn navigate(&self, route: Route);
}
