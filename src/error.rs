use crate::gutter::Position;

pub type Result<T> = std::result::Result<T, AnnotateError>;

#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    #[error("unknown palette '{0}'")]
    UnknownPalette(String),
    #[error("no color list found for '{palette}' palette")]
    MissingColorList { palette: &'static str },
    #[error("invalid color in '{palette}' palette: {color}")]
    InvalidColor { palette: &'static str, color: String },
    #[error("gutter orientation must be 'horizontal' or 'vertical', found '{0}'")]
    InvalidOrientation(String),
    #[error("document contains no image to use as the reference board")]
    NoReferenceImage,
    #[error("{position} gutter is too narrow to hold an annotation (depth {depth})")]
    GutterTooNarrow { position: Position, depth: f32 },
    #[error("assignment references unknown chip '{0}'")]
    UnresolvedChip(String),
    #[error("failed to read chip photo: {0}")]
    ImageRead(#[from] std::io::Error),
    #[error("{0}")]
    UnsupportedImage(String),
}
