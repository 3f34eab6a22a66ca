use serde::{Deserialize, Serialize};

use crate::{color::Color, error::PropsError, text::Align};

/// Optional overrides applied by [`Drawable::set_props`](crate::Drawable::set_props)
/// and [`Drawable::clone_with`](crate::Drawable::clone_with).
///
/// Every overridable field is listed here. The geometry fields apply to all
/// primitives; `color` applies to rects, ellipses and text; `text`, `size`,
/// `font` and `align` apply to text only. Setting a field the receiver does
/// not have is rejected before anything is modified.
///
/// JSON input uses the camel-cased names (`anchorX`, `xv`, ...) and unknown
/// keys are an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Props {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xv: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yv: Option<f32>,
    /// Degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse overrides from a JSON object.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    #[must_use]
    pub fn dimensions(mut self, w: f32, h: f32) -> Self {
        self.w = Some(w);
        self.h = Some(h);
        self
    }

    #[must_use]
    pub fn velocity(mut self, xv: f32, yv: f32) -> Self {
        self.xv = Some(xv);
        self.yv = Some(yv);
        self
    }

    #[must_use]
    pub fn rotation(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    #[must_use]
    pub fn anchor(mut self, x: f32, y: f32) -> Self {
        self.anchor_x = Some(x);
        self.anchor_y = Some(y);
        self
    }

    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn font(mut self, family: impl Into<String>) -> Self {
        self.font = Some(family.into());
        self
    }

    #[must_use]
    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    /// Names of the kind-specific fields that are set.
    fn specific_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            ("color", self.color.is_some()),
            ("text", self.text.is_some()),
            ("size", self.size.is_some()),
            ("font", self.font.is_some()),
            ("align", self.align.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
    }

    /// Reject kind-specific fields outside `allowed`.
    pub(crate) fn check(&self, kind: &'static str, allowed: &[&str]) -> Result<(), PropsError> {
        match self.specific_fields().find(|f| !allowed.contains(f)) {
            Some(field) => Err(PropsError::NotApplicable { field, kind }),
            None => Ok(()),
        }
    }
}
