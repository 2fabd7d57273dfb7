use async_trait::async_trait;
use clic_catalog::{NavigationRegistry, TagDictionary};
use clic_domain::config::{CatalogConfig, ResolutionConfig};
use clic_domain::{
    ContentPayload, ContentQuery, FilterOperator, NavLevel, PageIdentity, PageType, TenantId,
};
use clic_kernel::{ContentSource, RepositoryError};
use clic_routing::{NotFoundReason, RouteResolution, RouteResolver, RoutingError};
use clic_store::MemoryStore;
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

const DEMO: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../../fixtures/demo-site.json"));

fn resolver() -> RouteResolver {
    let store = Arc::new(MemoryStore::from_json(DEMO).expect("demo fixture parses"));
    let catalog = CatalogConfig::default();
    let resolution = ResolutionConfig::default();
    RouteResolver::new(
        TagDictionary::new(store.clone(), &catalog, &resolution),
        NavigationRegistry::new(store.clone(), &catalog, &resolution),
        store,
        &resolution,
    )
}

/// Serves the demo catalogs but never answers content calls.
#[derive(Debug)]
struct StalledContent;

#[async_trait]
impl ContentSource for StalledContent {
    async fn fetch_content(&self, _query: &ContentQuery) -> Result<ContentPayload, RepositoryError> {
        std::future::pending().await
    }

    async fn has_category(
        &self,
        _tenant: &TenantId,
        _content_type: &str,
        _slug: &str,
    ) -> Result<bool, RepositoryError> {
        std::future::pending().await
    }
}

async fn resolve(path: &str) -> RouteResolution {
    resolver()
        .resolve_path(&TenantId::from("demo"), "es", path)
        .await
        .expect("no infrastructure fault")
}

async fn found(path: &str) -> PageIdentity {
    match resolve(path).await {
        RouteResolution::Found(identity) => identity,
        RouteResolution::NotFound(route) => panic!("{path} should resolve: {route}"),
    }
}

async fn reason(path: &str) -> NotFoundReason {
    match resolve(path).await {
        RouteResolution::NotFound(route) => route.reason,
        RouteResolution::Found(identity) => panic!("{path} should not resolve: {identity:?}"),
    }
}

#[tokio::test]
async fn empty_paths_are_the_homepage() {
    for tenant in ["demo", "otra", "unknown"] {
        for path in ["", "/", "//", "/?ref=mail"] {
            let resolution = resolver()
                .resolve_path(&TenantId::from(tenant), "es", path)
                .await
                .unwrap();
            assert_eq!(resolution, RouteResolution::Found(PageIdentity::homepage()));
        }
    }
}

#[tokio::test]
async fn property_search_collects_tag_filters() {
    let identity = found("/comprar/apartamento/2-habitaciones/gym").await;

    assert_eq!(identity.page_type, PageType::PropertySearch);
    let filters: Vec<_> = identity
        .filters
        .iter()
        .map(|t| (t.target_field.as_str(), t.operator, t.value.clone()))
        .collect();
    assert_eq!(
        filters,
        vec![
            ("operacion", FilterOperator::Eq, json!("venta")),
            ("tipo_propiedad", FilterOperator::Eq, json!("apartamento")),
            ("habitaciones", FilterOperator::Gte, json!(2)),
            ("amenidades", FilterOperator::Contains, json!(["gym"])),
        ]
    );
    assert_eq!(identity.page_id(), "/venta/apartamento/2-habitaciones/gym");
}

#[tokio::test]
async fn trailing_unknown_segment_is_the_property_slug() {
    let identity = found("/comprar/apartamento/apto-chapinero-201/").await;

    assert_eq!(identity.page_type, PageType::PropertySingle);
    assert_eq!(identity.item_slug.as_deref(), Some("apto-chapinero-201"));
    assert_eq!(identity.filters.len(), 2);
}

#[tokio::test]
async fn unmatched_search_segments_are_not_found() {
    assert!(matches!(
        reason("/apto-chapinero-201").await,
        NotFoundReason::UnmatchedSegment { position: 0, .. }
    ));
    assert!(matches!(
        reason("/comprar/desconocido/gym").await,
        NotFoundReason::UnmatchedSegment { position: 1, .. }
    ));
}

#[tokio::test]
async fn percent_encoding_decodes_but_accents_do_not_fold() {
    let identity = found("/%63omprar").await;
    assert_eq!(identity.filters[0].slug, "venta");

    assert!(matches!(reason("/bogot%C3%A1").await, NotFoundReason::UnmatchedSegment { .. }));
    assert!(matches!(reason("/%FF").await, NotFoundReason::MalformedPath { .. }));
}

#[tokio::test]
async fn level_two_prefix_segment_counts() {
    let single = found("/testimonios/clientes-felices/juan-perez").await;
    assert_eq!(single.page_type, PageType::ContentSingle("testimonios".to_owned()));
    assert_eq!(single.level, Some(NavLevel::Categorized));
    assert_eq!(single.category_slug.as_deref(), Some("clientes-felices"));
    assert_eq!(single.item_slug.as_deref(), Some("juan-perez"));

    let category = found("/testimonios/clientes-felices").await;
    assert_eq!(category.page_type, PageType::ContentCategory("testimonios".to_owned()));

    let list = found("/testimonios").await;
    assert_eq!(list.page_type, PageType::ContentList("testimonios".to_owned()));

    assert!(matches!(
        reason("/testimonios/juan-perez").await,
        NotFoundReason::UnknownCategory { .. }
    ));
    assert!(matches!(
        reason("/testimonios/a/b/c").await,
        NotFoundReason::SegmentCount { level: 2, extra_segments: 3, .. }
    ));
}

#[tokio::test]
async fn level_one_and_static_prefixes() {
    let video = found("/videos/tour-chapinero").await;
    assert_eq!(video.page_type, PageType::ContentSingle("videos".to_owned()));
    assert!(video.category_slug.is_none());
    assert!(matches!(reason("/videos/a/b").await, NotFoundReason::SegmentCount { level: 1, .. }));

    let contact = found("/contactenos").await;
    assert_eq!(contact.page_type, PageType::Static("contacto".to_owned()));
    assert_eq!(contact.page_id(), "/contacto");
    assert!(matches!(
        reason("/contacto/extra").await,
        NotFoundReason::SegmentCount { level: 0, .. }
    ));
}

#[tokio::test]
async fn localized_prefixes_share_the_canonical_page() {
    let english = resolver()
        .resolve_path(&TenantId::from("demo"), "en", "/testimonials/clientes-felices/juan-perez")
        .await
        .unwrap();
    let spanish = resolve("/testimonios/clientes-felices/juan-perez").await;
    assert_eq!(english, spanish);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn resolution_ignores_surrounding_slashes(
        path in prop_oneof![
            Just("comprar/apartamento"),
            Just("testimonios/clientes-felices"),
            Just("videos"),
            Just("nada/que/ver"),
        ],
        leading in 0usize..3,
        trailing in 0usize..3,
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
        let decorated = format!("{}{}{}", "/".repeat(leading), path, "/".repeat(trailing));

        let (plain, padded) = runtime.block_on(async {
            (resolve(path).await, resolve(&decorated).await)
        });
        match (plain, padded) {
            (RouteResolution::Found(a), RouteResolution::Found(b)) => {
                prop_assert_eq!(a, b);
            },
            (RouteResolution::NotFound(a), RouteResolution::NotFound(b)) => {
                prop_assert_eq!(a.reason, b.reason);
            },
            _ => prop_assert!(false, "outcome changed with slashes"),
        }
    }
}

#[tokio::test]
async fn stalled_category_check_times_out() {
    let store = Arc::new(MemoryStore::from_json(DEMO).expect("demo fixture parses"));
    let catalog = CatalogConfig::default();
    let resolution = ResolutionConfig { fetch_timeout_ms: 50, ..ResolutionConfig::default() };
    let resolver = RouteResolver::new(
        TagDictionary::new(store.clone(), &catalog, &resolution),
        NavigationRegistry::new(store, &catalog, &resolution),
        Arc::new(StalledContent),
        &resolution,
    );
    let demo = TenantId::from("demo");

    let err = resolver
        .resolve_path(&demo, "es", "/testimonios/clientes-felices")
        .await
        .expect_err("category check cannot finish");
    assert!(matches!(err, RoutingError::Timeout { .. }), "{err}");
    assert_eq!(err.kind(), "timeout");

    // Routes that never consult the content source are unaffected.
    let single = resolver.resolve_path(&demo, "es", "/testimonios/clientes-felices/juan-perez");
    assert!(matches!(single.await, Ok(RouteResolution::Found(_))));
}

#[tokio::test]
async fn tag_order_in_the_url_shares_one_page_id() {
    let written = found("/comprar/apartamento/gym").await;
    let swapped = found("/gym/apartamento/comprar").await;

    assert_eq!(written.page_id(), "/venta/apartamento/gym");
    assert_eq!(swapped.page_id(), written.page_id());
}
