pub mod navigation;
pub mod pagination;
pub mod templates;

pub use navigation::NavigationComponent;
pub use templates::TemplateComponent;
