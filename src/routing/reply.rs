//! Values route handlers return.

use std::path::PathBuf;

use crate::payload::{Content, Payload};
use crate::templating::{Model, ModelAndView};

/// A handler's result before it becomes a payload.
#[derive(Debug, Clone)]
pub enum Reply {
    /// A complete payload, used as-is.
    Payload(Payload),
    /// A view model, rendered with the view named after the request URI.
    Model(Model),
    /// A body served with status 200.
    Content(Content),
}

impl From<Payload> for Reply {
    fn from(payload: Payload) -> Self {
        Reply::Payload(payload)
    }
}

impl From<Model> for Reply {
    fn from(model: Model) -> Self {
        Reply::Model(model)
    }
}

impl From<Content> for Reply {
    fn from(content: Content) -> Self {
        Reply::Content(content)
    }
}

macro_rules! reply_from_content {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Reply {
                fn from(value: $ty) -> Self {
                    Reply::Content(Content::from(value))
                }
            }
        )*
    };
}

reply_from_content!(String, &str, Vec<u8>, PathBuf, ModelAndView, serde_json::Value);
