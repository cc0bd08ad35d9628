//! Server-rendered HTML views.
//!
//! Templates are compiled into the binary and rendered with Handlebars in
//! its default (non-strict) mode: a value that is not supplied renders as an
//! empty string instead of failing the page.

use handlebars::{Handlebars, RenderError, TemplateError};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::json;

/// Characters left as-is in query values, matching `encodeURIComponent`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.hbs");
const FACE_TEMPLATE: &str = include_str!("../../templates/face.hbs");
const POP_UPLOAD_TEMPLATE: &str = include_str!("../../templates/pop_upload.hbs");
const FACE_CON_TEMPLATE: &str = include_str!("../../templates/face_con.hbs");
const FACE_COMPLETE_TEMPLATE: &str = include_str!("../../templates/face_complete.hbs");

pub struct PageRenderer {
    handlebars: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_template_string("index", INDEX_TEMPLATE)?;
        handlebars.register_template_string("face", FACE_TEMPLATE)?;
        handlebars.register_template_string("pop_upload", POP_UPLOAD_TEMPLATE)?;
        handlebars.register_template_string("face_con", FACE_CON_TEMPLATE)?;
        handlebars.register_template_string("face_complete", FACE_COMPLETE_TEMPLATE)?;
        Ok(Self { handlebars })
    }

    /// Home view linking to the companion service.
    pub fn home(&self, companion_url: &str) -> Result<String, RenderError> {
        self.handlebars
            .render("index", &json!({ "node_main": companion_url }))
    }

    pub fn face(&self, companion_url: &str) -> Result<String, RenderError> {
        self.handlebars
            .render("face", &json!({ "node_main": companion_url }))
    }

    pub fn upload_form(&self) -> Result<String, RenderError> {
        self.handlebars.render("pop_upload", &json!({}))
    }

    /// Pre-detection view for the most recent upload.
    pub fn face_con(&self, video_name: Option<&str>) -> Result<String, RenderError> {
        self.handlebars.render(
            "face_con",
            &json!({
                "video_name": video_name,
                "video_query": video_name.map(encode_query_value),
            }),
        )
    }

    pub fn face_complete(
        &self,
        video_name: Option<&str>,
        companion_url: &str,
    ) -> Result<String, RenderError> {
        self.handlebars.render(
            "face_complete",
            &json!({
                "video_name": video_name,
                "video_query": video_name.map(encode_query_value),
                "node_main": companion_url,
            }),
        )
    }
}

/// Percent-encodes a video name for use as a query string value.
pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}
