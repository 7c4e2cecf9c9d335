//! Gallery media upload: an image, or a link to a video

use crate::state::forms::{
    Condition, FieldKind, FieldSpec, FormDefinition, FormKind, Rule, Schema, StepDefinition,
    WizardError,
};

pub const CONTENT_TYPES: &[&str] = &["image", "video"];
pub const CATEGORIES: &[&str] = &["events", "programs", "awareness", "other"];

const VIDEO_URL_PATTERN: &str = r"^https?://\S+$";

pub fn upload(max_upload_bytes: u64) -> Result<FormDefinition, WizardError> {
    let schema = Schema::new(vec![
        FieldSpec::new("title", "Title", FieldKind::Text)
            .required()
            .rule(Rule::MaxLength(120)),
        FieldSpec::new("category", "Category", FieldKind::Choice)
            .required()
            .rule(Rule::one_of(CATEGORIES)),
        FieldSpec::new("content_type", "Content type", FieldKind::Choice)
            .required()
            .rule(Rule::one_of(CONTENT_TYPES)),
        FieldSpec::new("image", "Image", FieldKind::File)
            .required_when(Condition::Equals("content_type".into(), "image".into()))
            .rule(Rule::MaxFileBytes(max_upload_bytes)),
        FieldSpec::new("video_url", "Video URL", FieldKind::Text)
            .required_when(Condition::Equals("content_type".into(), "video".into()))
            .rule(Rule::pattern(VIDEO_URL_PATTERN, "Video URL must start with http:// or https://")?),
        FieldSpec::new("caption", "Caption", FieldKind::Multiline).rule(Rule::MaxLength(300)),
    ])?;

    FormDefinition::new(
        FormKind::GalleryUpload,
        "Gallery upload",
        schema,
        vec![
            StepDefinition::new(0, "Details", &["title", "category", "content_type"]),
            StepDefinition::new(1, "Media", &["image", "video_url", "caption"]),
        ],
    )
}
