//! The gallery's single service object.
//!
//! Built once at startup from the settings and the two host collaborators,
//! then shared by reference. Every component is a cheap borrowed view handed
//! out on demand; none of them hold state of their own.

use crate::ajax::GalleryAjaxService;
use crate::catalog::{AttachmentCatalog, MetaStore};
use crate::config::RenderSettings;
use crate::inject::ContentInjector;
use crate::resolver::AttachmentResolver;
use crate::routes::Routes;
use crate::store::GalleryStore;
use crate::thumbnail::ThumbnailRenderer;
use std::sync::Arc;

pub struct GalleryService {
    settings: RenderSettings,
    catalog: Arc<dyn AttachmentCatalog>,
    meta: Arc<dyn MetaStore>,
    routes: Routes,
}

impl GalleryService {
    pub fn new(
        settings: RenderSettings,
        catalog: Arc<dyn AttachmentCatalog>,
        meta: Arc<dyn MetaStore>,
    ) -> Self {
        let routes = Routes::new(settings.content.filter_priority);
        Self {
            settings,
            catalog,
            meta,
            routes,
        }
    }

    /// Service over one object that is both catalog and metadata store.
    pub fn with_site<S>(settings: RenderSettings, site: Arc<S>) -> Self
    where
        S: AttachmentCatalog + MetaStore + 'static,
    {
        let catalog: Arc<dyn AttachmentCatalog> = site.clone();
        let meta: Arc<dyn MetaStore> = site;
        Self::new(settings, catalog, meta)
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn resolver(&self) -> AttachmentResolver<'_> {
        AttachmentResolver::new(self.catalog.as_ref())
    }

    pub fn renderer(&self) -> ThumbnailRenderer<'_> {
        ThumbnailRenderer::new(&self.settings, self.resolver())
    }

    pub fn store(&self) -> GalleryStore<'_> {
        GalleryStore::new(self.meta.as_ref())
    }

    pub fn ajax(&self) -> GalleryAjaxService<'_> {
        GalleryAjaxService::new(self.renderer(), self.catalog.as_ref())
    }

    pub fn injector(&self) -> ContentInjector<'_> {
        ContentInjector::new(self.store(), self.resolver())
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }
}
