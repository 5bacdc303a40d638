mod is_secure;
mod viewer;

pub use is_secure::IsSecure;
pub use viewer::Viewer;
