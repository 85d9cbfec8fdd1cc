// Shared margins
pub const UI_MARGIN: f32 = 10.0;

// Common spacing between grouped controls
pub const SECTION_SPACING: f32 = 6.0;

// Side panel sizing
pub const TOOLBOX_WIDTH: f32 = 220.0;
pub const PROPERTIES_WIDTH: f32 = 300.0;

// Text sizes
pub const INFO_TEXT_SIZE: f32 = 11.0; // status bar
pub const HEADING_TEXT_SIZE: f32 = 16.0; // panel headings

// Note editor
pub const NOTE_EDITOR_ROWS: usize = 12;

// Placement of subtopics added next to the selection
pub const SUBTOPIC_OFFSET_X: f32 = 250.0;
