//! # Lightbox Gallery
//!
//! Per-entry image galleries for a content host. An editor picks images for
//! an entry, reorders them and saves; the host's public pages then show the
//! entry's gallery as a grid of thumbnails that open in a lightbox overlay.
//!
//! The crate owns only the gallery. Attachments (files with their metadata and
//! sized renditions) and per-entity metadata storage belong to the host and are
//! reached through two traits, [`catalog::AttachmentCatalog`] and
//! [`catalog::MetaStore`]. [`memory::Site`] implements both over a JSON file
//! for the CLI and the tests.
//!
//! # Data Flow
//!
//! ```text
//!            editor                                   visitor
//!              │                                        │
//!   fetch_one / fetch_remaining                   content render
//!              │                                        │
//!        GalleryAjaxService                      ContentInjector
//!              │                                  │          │
//!       ThumbnailRenderer  ◄──────────────────────┘    GalleryStore
//!              │                                            │
//!      AttachmentResolver ── CaptionTemplateEngine      MetaStore
//!              │
//!      AttachmentCatalog
//! ```
//!
//! A gallery is nothing more than an ordered list of image refs stored under
//! one metadata key on the entity. Order is the display order.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `EntityId`, `AttachmentId`, `ImageRef`, `ViewContext` |
//! | [`catalog`] | Host collaborator traits and the attachment record |
//! | [`memory`] | JSON-file backed `Site` implementing both collaborator traits |
//! | [`resolver`] | Ref → display metadata, with named sized renditions |
//! | [`caption`] | `%title%`-style caption templates |
//! | [`thumbnail`] | Admin and public thumbnail fragments and their `<li>` markup |
//! | [`store`] | Read, write and save the ordered list; legacy value decoding |
//! | [`ajax`] | Incremental editor sync with cache-disabling responses |
//! | [`lightbox`] | The lightbox overlay skeleton |
//! | [`directive`] | `[gallery]` / `[gallery id=N]` embedding directive parser |
//! | [`inject`] | Appending galleries to content and expanding directives |
//! | [`routes`] | Operation name → handler table, content-filter registration |
//! | [`service`] | `GalleryService`, built once at startup |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`output`] | CLI inventory formatting for `show`, `save` and sync responses |
//!
//! # Design Decisions
//!
//! ## Degrade, Don't Fail
//!
//! A gallery is decoration around content. A missing attachment renders as a
//! placeholder in its slot, a catalog outage during "add all" returns nothing
//! to add, and an unreadable gallery leaves the content body as it was. Each of
//! these is logged with `tracing`. The only hard failure visible to a caller is
//! a rejected save.
//!
//! ## Maud for Markup
//!
//! Fragments are built with [Maud](https://maud.lambda.xyz/). Attribute values
//! and text are escaped at interpolation. Captions are the exception: template
//! output goes into a `title` attribute, which Maud escapes, but the template
//! engine itself never escapes.
//!
//! ## Explicit Service Object
//!
//! Settings and collaborators are passed to [`service::GalleryService`] once.
//! Components are borrowed views over it, so there is no global state and
//! tests can build a whole gallery stack around an in-memory site.

pub mod ajax;
pub mod caption;
pub mod catalog;
pub mod config;
pub mod directive;
pub mod inject;
pub mod lightbox;
pub mod memory;
pub mod output;
pub mod resolver;
pub mod routes;
pub mod service;
pub mod store;
pub mod thumbnail;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
