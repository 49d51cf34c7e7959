mod central_panel;
mod control_panel;

pub use central_panel::central_panel;
pub use control_panel::control_panel;
