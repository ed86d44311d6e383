pub mod headless;
pub mod marker;
pub mod route;
