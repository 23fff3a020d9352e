//! Operation routing for the editor's sync requests.
//!
//! The host passes an operation name and the request's parameters; the table
//! maps the name to a handler. Parameters are multi-valued because the
//! "add all" request repeats `included` once per image already shown.
//!
//! | Operation                   | Parameters                    |
//! |-----------------------------|-------------------------------|
//! | `gallery_get_thumbnail`     | `imageid`                     |
//! | `gallery_get_all_thumbnail` | `post_id`, `included` (0..n)  |
//!
//! Malformed parameters get an empty (but still uncached) response rather
//! than an error, matching how the editor treats "nothing to add".

use crate::ajax::{GalleryAjaxService, SyncResponse, exclusion_set};
use crate::types::{EntityId, ImageRef};
use std::collections::BTreeMap;
use thiserror::Error;

pub const GET_THUMBNAIL: &str = "gallery_get_thumbnail";
pub const GET_ALL_THUMBNAILS: &str = "gallery_get_all_thumbnail";

/// Hook name the public output is registered under.
pub const CONTENT_FILTER: &str = "the_content";

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
}

/// Multi-valued request parameters, in arrival order per key.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    values: BTreeMap<String, Vec<String>>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.push(key, value);
        }
        params
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Every value for `key`; `key[]` form fields are folded in.
    pub fn all(&self, key: &str) -> Vec<&str> {
        let bracketed = format!("{key}[]");
        [key, bracketed.as_str()]
            .iter()
            .filter_map(|k| self.values.get(*k))
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

pub type Handler = fn(&GalleryAjaxService<'_>, &RequestParams) -> SyncResponse;

/// Where the public output hooks into content rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterRegistration {
    pub hook: &'static str,
    pub priority: i32,
}

pub struct Routes {
    handlers: BTreeMap<&'static str, Handler>,
    content_filter: FilterRegistration,
}

impl Routes {
    /// The gallery's routes, with the content filter at `filter_priority`.
    pub fn new(filter_priority: i32) -> Self {
        let mut handlers: BTreeMap<&'static str, Handler> = BTreeMap::new();
        handlers.insert(GET_THUMBNAIL, get_thumbnail);
        handlers.insert(GET_ALL_THUMBNAILS, get_all_thumbnails);
        Self {
            handlers,
            content_filter: FilterRegistration {
                hook: CONTENT_FILTER,
                priority: filter_priority,
            },
        }
    }

    pub fn operations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    pub fn content_filter(&self) -> FilterRegistration {
        self.content_filter
    }

    pub fn dispatch(
        &self,
        operation: &str,
        service: &GalleryAjaxService<'_>,
        params: &RequestParams,
    ) -> Result<SyncResponse, RouteError> {
        let handler = self
            .handlers
            .get(operation)
            .ok_or_else(|| RouteError::UnknownOperation(operation.to_string()))?;
        tracing::debug!("Dispatching {}", operation);
        Ok(handler(service, params))
    }
}

fn get_thumbnail(service: &GalleryAjaxService<'_>, params: &RequestParams) -> SyncResponse {
    match params.get("imageid").and_then(ImageRef::parse) {
        Some(image) => service.fetch_one(&image),
        None => {
            tracing::debug!("{} without a usable imageid", GET_THUMBNAIL);
            SyncResponse::empty()
        }
    }
}

fn get_all_thumbnails(service: &GalleryAjaxService<'_>, params: &RequestParams) -> SyncResponse {
    let Some(entity) = params
        .get("post_id")
        .and_then(|raw| raw.trim().parse().ok())
        .map(EntityId)
    else {
        tracing::debug!("{} without a usable post_id", GET_ALL_THUMBNAILS);
        return SyncResponse::empty();
    };
    let included = params.all("included");
    let excluded = exclusion_set(included.as_slice());
    service.fetch_remaining(entity, &excluded)
}
