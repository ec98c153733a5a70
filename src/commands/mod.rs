pub mod render;
pub mod report;

pub use render::RenderCommand;
pub use report::ReportCommand;
