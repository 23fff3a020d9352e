//! End-to-end behavior through the public API: a site with five images under
//! one entry, driven the way the host would drive it.

use lightbox_gallery::ajax::exclusion_set;
use lightbox_gallery::caption;
use lightbox_gallery::catalog::{AttachmentRecord, MetaStore};
use lightbox_gallery::config::{self, RenderSettings};
use lightbox_gallery::memory::Site;
use lightbox_gallery::output;
use lightbox_gallery::resolver::{AttachmentMetadata, PUBLIC_THUMB_SIZE};
use lightbox_gallery::routes::{GET_ALL_THUMBNAILS, RequestParams};
use lightbox_gallery::service::GalleryService;
use lightbox_gallery::store::{GALLERY_META_KEY, IntegrityCheck, SaveOutcome, SaveRequest};
use lightbox_gallery::types::{AttachmentId, EntityId, ImageRef, ViewContext};
use std::collections::BTreeMap;
use std::sync::Arc;

const ENTRY: EntityId = EntityId(5);

fn record(id: u64) -> AttachmentRecord {
    AttachmentRecord {
        id: AttachmentId(id),
        parent: Some(ENTRY),
        mime_type: "image/jpeg".to_string(),
        url: format!("/uploads/img-{id}.jpg"),
        width: 800,
        height: 600,
        title: format!("Image {id}"),
        alt: String::new(),
        caption: String::new(),
        sizes: BTreeMap::new(),
    }
}

fn site() -> Site {
    Site::with_attachments([3, 5, 7, 9, 11].map(record))
}

fn service_with(settings: RenderSettings) -> GalleryService {
    GalleryService::with_site(settings, Arc::new(site()))
}

fn service() -> GalleryService {
    service_with(RenderSettings::default())
}

fn strs(refs: &[ImageRef]) -> Vec<&str> {
    refs.iter().map(ImageRef::as_str).collect()
}

fn view(singular: bool, protected: bool) -> ViewContext {
    ViewContext {
        is_password_protected: protected,
        is_singular_view: singular,
    }
}

// =============================================================================
// Store
// =============================================================================

#[test]
fn write_keeps_numeric_refs_in_order() {
    let service = service();
    let store = service.store();
    store.write(ENTRY, &["12", "abc", "7", "3x"]).unwrap();
    assert_eq!(strs(&store.read(ENTRY).unwrap()), vec!["12", "7"]);
}

#[test]
fn writing_empty_list_clears_gallery() {
    let service = service();
    let store = service.store();
    store.write(ENTRY, &["3", "7"]).unwrap();
    store.write::<&str>(ENTRY, &[]).unwrap();
    assert!(store.read(ENTRY).unwrap().is_empty());
}

#[test]
fn never_written_entity_reads_empty() {
    assert!(service().store().read(EntityId(77)).unwrap().is_empty());
}

struct Fixed(&'static str);

impl IntegrityCheck for Fixed {
    fn verify(&self, _entity: EntityId, token: &str) -> bool {
        token == self.0
    }
}

#[test]
fn save_requires_valid_token_and_skips_autosave() {
    let service = service();
    let store = service.store();
    store.write(ENTRY, &["3"]).unwrap();

    let forged = SaveRequest {
        token: Some("wrong".into()),
        images: vec!["9".into()],
        autosave: false,
    };
    assert!(store.save(ENTRY, &forged, &Fixed("ok")).is_err());
    assert_eq!(strs(&store.read(ENTRY).unwrap()), vec!["3"]);

    let autosave = SaveRequest {
        token: Some("ok".into()),
        images: vec!["9".into()],
        autosave: true,
    };
    assert_eq!(
        store.save(ENTRY, &autosave, &Fixed("ok")).unwrap(),
        SaveOutcome::Skipped
    );
    assert_eq!(strs(&store.read(ENTRY).unwrap()), vec!["3"]);

    let real = SaveRequest {
        token: Some("ok".into()),
        images: vec!["9".into(), "x".into(), "3".into()],
        autosave: false,
    };
    store.save(ENTRY, &real, &Fixed("ok")).unwrap();
    assert_eq!(strs(&store.read(ENTRY).unwrap()), vec!["9", "3"]);
}

// =============================================================================
// Editor sync
// =============================================================================

#[test]
fn fetch_remaining_excludes_by_id_in_catalog_order() {
    let service = service();
    let response = service
        .ajax()
        .fetch_remaining(ENTRY, &exclusion_set(&["5", "9"]));
    assert_eq!(response.fragments.len(), 3);
    let body = response.body();
    let p3 = body.find("img-3.jpg").unwrap();
    let p7 = body.find("img-7.jpg").unwrap();
    let p11 = body.find("img-11.jpg").unwrap();
    assert!(p3 < p7 && p7 < p11);
    assert!(!body.contains("img-5.jpg"));
    assert!(!body.contains("img-9.jpg"));
}

#[test]
fn routed_request_matches_direct_call() {
    let service = service();
    let params =
        RequestParams::from_pairs([("post_id", "5"), ("included", "5"), ("included", "9")]);
    let routed = service
        .routes()
        .dispatch(GET_ALL_THUMBNAILS, &service.ajax(), &params)
        .unwrap();
    let direct = service
        .ajax()
        .fetch_remaining(ENTRY, &exclusion_set(&["5", "9"]));
    assert_eq!(routed.body(), direct.body());
}

// =============================================================================
// Captions
// =============================================================================

fn metadata(title: &str, caption: &str) -> AttachmentMetadata {
    let mut record = record(1);
    record.title = title.to_string();
    record.caption = caption.to_string();
    AttachmentMetadata::from(record)
}

#[test]
fn caption_template_substitutes_tokens() {
    let data = metadata("Sunset", "Beach");
    assert_eq!(caption::render("%title% - %caption%", &data), "Sunset - Beach");
    assert_eq!(caption::render("A\nB", &data), "A - B");
}

// =============================================================================
// Public output
// =============================================================================

#[test]
fn gallery_only_appended_on_singular_view() {
    let service = service();
    service.store().write(ENTRY, &["3"]).unwrap();
    let injector = service.injector();
    let settings = service.settings();

    let listing = injector.apply("<p>x</p>", ENTRY, &view(false, false), settings);
    assert_eq!(listing, "<p>x</p>");

    let single = injector.apply("<p>x</p>", ENTRY, &view(true, false), settings);
    assert!(single.starts_with("<p>x</p>"));
    assert!(single.contains("img-3.jpg"));
    assert!(single.contains("blueimp-gallery"));
}

#[test]
fn password_protected_content_is_untouched() {
    for append in [true, false] {
        for single_only in [true, false] {
            let mut settings = RenderSettings::default();
            settings.content.append = append;
            settings.content.single_only = single_only;
            let service = service_with(settings);
            service.store().write(ENTRY, &["3"]).unwrap();
            for singular in [true, false] {
                let out = service.injector().apply(
                    "body",
                    ENTRY,
                    &view(singular, true),
                    service.settings(),
                );
                assert_eq!(out, "body");
            }
        }
    }
}

#[test]
fn unresolvable_ref_renders_placeholder_in_place() {
    let service = service();
    service.store().write(ENTRY, &["3", "999", "7"]).unwrap();
    let html = service
        .injector()
        .render_gallery(ENTRY, service.settings())
        .unwrap()
        .into_string();

    assert_eq!(html.matches("<li").count(), 3);
    let p3 = html.find("img-3.jpg").unwrap();
    let hole = html.find(r#"<li class="gallery-placeholder"></li>"#).unwrap();
    let p7 = html.find("img-7.jpg").unwrap();
    assert!(p3 < hole && hole < p7);

    let fragment = service.renderer().render_public(&ImageRef::from(AttachmentId(999)));
    assert!(fragment.url.is_empty());
}

#[test]
fn resize_proxy_rewrites_public_thumbnails() {
    let mut settings = RenderSettings::default();
    settings.resize_proxy.enabled = true;
    let service = service_with(settings);
    let fragment = service
        .renderer()
        .render_public(&ImageRef::from(AttachmentId(3)));
    assert_eq!(
        fragment.url,
        "/timthumb.php?src=%2Fuploads%2Fimg-3.jpg&q=85&w=150&h=150"
    );
    assert_eq!((fragment.width, fragment.height), (150, 150));
}

#[test]
fn public_thumbnail_uses_named_rendition_when_present() {
    let mut with_sizes = record(3);
    with_sizes.sizes.insert(
        PUBLIC_THUMB_SIZE.to_string(),
        lightbox_gallery::catalog::SizedVariant {
            url: "/uploads/img-3-150x150.jpg".into(),
            width: 150,
            height: 113,
        },
    );
    let site = Site::with_attachments([with_sizes]);
    let service = GalleryService::with_site(RenderSettings::default(), Arc::new(site));
    let fragment = service
        .renderer()
        .render_public(&ImageRef::from(AttachmentId(3)));
    assert_eq!(fragment.url, "/uploads/img-3-150x150.jpg");
    assert_eq!((fragment.width, fragment.height), (150, 113));
    assert_eq!(fragment.link_href, "/uploads/img-3.jpg");
}

#[test]
fn directive_embeds_another_entrys_gallery() {
    let service = service();
    service.store().write(EntityId(8), &["11"]).unwrap();
    let out = service
        .injector()
        .expand_directives("see [gallery id=8]", ENTRY, service.settings());
    assert!(out.starts_with("see <div class=\"gallery-container\">"));
    assert!(out.contains("img-11.jpg"));
}

// =============================================================================
// Files
// =============================================================================

#[test]
fn site_file_round_trips_gallery() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("site.json");

    let original = site();
    original
        .set_meta(ENTRY, GALLERY_META_KEY, serde_json::json!(["7", "3"]))
        .unwrap();
    original.save(&path).unwrap();

    let reloaded = Site::load(&path).unwrap();
    let service = GalleryService::with_site(RenderSettings::default(), Arc::new(reloaded));
    assert_eq!(strs(&service.store().read(ENTRY).unwrap()), vec!["7", "3"]);
}

#[test]
fn config_dir_overrides_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[thumbnails]\nwidth = 200\n\n[content]\nsingle_only = false\n",
    )
    .unwrap();
    let settings = config::load_settings(dir.path()).unwrap();
    assert_eq!(settings.thumbnails.width, 200);
    assert_eq!(settings.thumbnails.height, 150);
    assert!(!settings.content.single_only);
    assert!(settings.content.append);
}

// =============================================================================
// CLI output
// =============================================================================

#[test]
fn show_inventory_lists_stored_gallery() {
    let service = service();
    service.store().write(ENTRY, &["7", "999"]).unwrap();
    let images = service.store().read(ENTRY).unwrap();
    let lines = output::format_gallery(ENTRY, &images, &service.resolver());
    assert_eq!(
        lines,
        vec![
            "Gallery of entity 5 (2 images)",
            "001 Image 7",
            "    Source: img-7.jpg",
            "002 (999) missing",
        ]
    );
}
