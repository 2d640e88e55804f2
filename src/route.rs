use std::fmt;
use std::str::FromStr;

/// The console pages, selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Recognition,
    VehicleAdmin,
}

impl View {
    pub fn path(self) -> &'static str {
        match self {
            View::Recognition => "/",
            View::VehicleAdmin => "/manage",
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches('/').to_ascii_lowercase().as_str() {
            "" | "recognition" | "/recognition" => Ok(View::Recognition),
            "manage" | "/manage" | "admin" => Ok(View::VehicleAdmin),
            other => Err(format!("Unknown view '{}'", other)),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
