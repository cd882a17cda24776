#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    CaptureImage,
    ComposeReport,
    ShareSummary,
    Refresh,
    None,
}
