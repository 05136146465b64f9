pub mod controls;
pub mod preview;
pub mod selection;
pub mod state;

pub use controls::{__path_handle_control, __path_handle_directive, __path_handle_refresh};
pub use controls::{
    handle_control, handle_directive, handle_refresh, ChangeResponse, ControlRequest,
    DirectiveRequest,
};
pub use preview::{__path_handle_preview, __path_handle_preview_data_url};
pub use preview::{handle_preview, handle_preview_data_url};
pub use selection::{
    __path_handle_clear, __path_handle_select, __path_handle_source_data_url,
    __path_handle_source_image,
};
pub use selection::{
    handle_clear, handle_select, handle_source_data_url, handle_source_image, SelectionResponse,
};
pub use state::{__path_handle_events, __path_handle_state};
pub use state::{handle_events, handle_state, ArtifactInfo, ErrorInfo, SelectionInfo, StateResponse};
