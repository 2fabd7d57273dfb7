use crate::error::{HydrationError, HydrationErrorExt};
use crate::filters::{authored_filters, has_identifier, page_filters, page_item_slug};
use clic_domain::config::ResolutionConfig;
use clic_domain::{
    AggregateKind, ComponentRecord, ContentFilter, ContentPayload, ContentQuery, DataErrorMarker,
    DataType, DynamicDataSpec, PageIdentity, PageRequest, Pagination, ResolvedComponent,
    ResolvedData, TenantId,
};
use clic_kernel::ContentSource;
use fxhash::FxHashMap;
use serde_json::Value;
use std::ops::Deref;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, instrument, warn};

#[derive(Debug)]
pub struct DataResolverInner {
    content: Arc<dyn ContentSource>,
    settings: ResolutionConfig,
}

/// Hydrates components with the data their `dynamicData` declares.
#[derive(Debug, Clone)]
pub struct DataResolver {
    inner: Arc<DataResolverInner>,
}

impl Deref for DataResolver {
    type Target = DataResolverInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DataResolver {
    #[must_use]
    pub fn new(content: Arc<dyn ContentSource>, settings: &ResolutionConfig) -> Self {
        Self { inner: Arc::new(DataResolverInner { content, settings: settings.clone() }) }
    }

    /// Effective pagination: page at least 1, limit defaulted then clamped to `1..=max`.
    #[must_use]
    pub fn page_request(&self, pagination: Option<Pagination>) -> PageRequest {
        let max = self.settings.max_page_limit.max(1);
        let (page, limit) = pagination.map_or((1, None), |p| (p.page, p.limit));
        PageRequest {
            page: page.max(1),
            limit: limit.unwrap_or(self.settings.default_page_limit).clamp(1, max),
        }
    }

    /// Resolves the data of one component.
    ///
    /// Never fails: an unsupported label, a source error or a timeout leaves the component with
    /// [`ResolvedData::Empty`] and a [`DataErrorMarker`].
    #[instrument(skip_all, fields(%tenant, component = %record.id))]
    pub async fn resolve_dynamic_data(
        &self,
        tenant: &TenantId,
        language: &str,
        identity: &PageIdentity,
        record: ComponentRecord,
    ) -> ResolvedComponent {
        let component = ResolvedComponent::from_record(record);
        let Some(spec) = component.config.dynamic_data.as_ref() else {
            return component;
        };

        let fetch = self.fetch(tenant, language, identity, spec, &component.config.static_data);
        let result = match tokio::time::timeout(self.settings.fetch_timeout(), fetch).await {
            Ok(result) => result,
            Err(_) => Err(HydrationError::Timeout {
                message: format!("no answer within {} ms", self.settings.fetch_timeout_ms).into(),
                context: None,
            }),
        };

        match result {
            Ok(data) => component.with_data(data),
            Err(err) => failed(component, &err),
        }
    }

    /// Resolves every component concurrently and returns them in input order.
    ///
    /// A panicking fetch is contained in its task and reported as an `internal` marker.
    #[instrument(skip_all, fields(%tenant, components = records.len()))]
    pub async fn resolve_all(
        &self,
        tenant: &TenantId,
        language: &str,
        identity: &PageIdentity,
        records: Vec<ComponentRecord>,
    ) -> Vec<ResolvedComponent> {
        let identity = Arc::new(identity.clone());
        let mut slots: Vec<Option<ResolvedComponent>> = Vec::with_capacity(records.len());
        let mut pending = FxHashMap::default();
        let mut tasks = JoinSet::new();

        for (position, record) in records.into_iter().enumerate() {
            if record.config.dynamic_data.is_none() {
                slots.push(Some(ResolvedComponent::from_record(record)));
                continue;
            }
            slots.push(None);

            let fallback = ResolvedComponent::from_record(record.clone());
            let resolver = self.clone();
            let tenant = tenant.clone();
            let language = language.to_owned();
            let identity = Arc::clone(&identity);
            let handle = tasks.spawn(
                async move {
                    resolver.resolve_dynamic_data(&tenant, &language, &identity, record).await
                }
                .in_current_span(),
            );
            pending.insert(handle.id(), (position, fallback));
        }

        debug!(fetches = tasks.len(), "Hydrating components");
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, component)) => {
                    if let Some((position, _)) = pending.remove(&id) {
                        slots[position] = Some(component);
                    }
                },
                Err(err) => {
                    if let Some((position, fallback)) = pending.remove(&err.id()) {
                        let err = HydrationError::Internal {
                            message: format!("data task failed: {err}").into(),
                            context: None,
                        };
                        slots[position] = Some(failed(fallback, &err));
                    }
                },
            }
        }

        slots.into_iter().flatten().collect()
    }

    async fn fetch(
        &self,
        tenant: &TenantId,
        language: &str,
        identity: &PageIdentity,
        spec: &DynamicDataSpec,
        static_data: &Value,
    ) -> Result<ResolvedData, HydrationError> {
        let data_type = spec.parsed_type()?;
        let request = self.page_request(spec.pagination);
        let mut filters = authored_filters(&spec.filters);
        let mut page = None;

        match data_type {
            DataType::Aggregate(AggregateKind::LooseText) => {
                return Ok(ResolvedData::Aggregate { value: static_data.clone() });
            },
            DataType::List(kind) => {
                filters.extend(page_filters(kind, identity));
                page = Some(request);
            },
            DataType::Single(kind) => {
                if !has_identifier(&filters) {
                    let slug = page_item_slug(kind, identity).ok_or_else(|| {
                        HydrationError::MissingIdentifier {
                            message: format!(
                                "'{data_type}' has no id or slug filter and the page has no \
                                 item of that kind"
                            )
                            .into(),
                            context: None,
                        }
                    })?;
                    filters.push(ContentFilter::eq("slug", slug));
                }
            },
            DataType::Category(_) | DataType::Aggregate(_) => {},
        }

        let query = ContentQuery {
            tenant_id: tenant.clone(),
            language: language.to_owned(),
            data_type,
            filters,
            page,
        };
        let payload = self.content.fetch_content(&query).await.context("Fetching component data")?;
        shape(data_type, request, payload)
    }
}

fn shape(
    data_type: DataType,
    request: PageRequest,
    payload: ContentPayload,
) -> Result<ResolvedData, HydrationError> {
    match (data_type, payload) {
        (DataType::List(_), ContentPayload::Page { items, total }) => Ok(ResolvedData::List {
            items,
            total,
            page: request.page,
            page_count: page_count(total, request.limit),
        }),
        (DataType::Single(_), ContentPayload::Item(item)) => Ok(ResolvedData::Single { item }),
        (DataType::Category(_), ContentPayload::Categories(categories)) => {
            Ok(ResolvedData::Categories { categories })
        },
        (DataType::Aggregate(_), ContentPayload::Aggregate(value)) => {
            Ok(ResolvedData::Aggregate { value })
        },
        (data_type, payload) => Err(HydrationError::UnexpectedPayload {
            message: format!("'{data_type}' was answered with a {} payload", payload_name(&payload))
                .into(),
            context: None,
        }),
    }
}

fn page_count(total: u64, limit: u32) -> u32 {
    u32::try_from(total.div_ceil(u64::from(limit.max(1)))).unwrap_or(u32::MAX)
}

const fn payload_name(payload: &ContentPayload) -> &'static str {
    match payload {
        ContentPayload::Page { .. } => "page",
        ContentPayload::Item(_) => "item",
        ContentPayload::Categories(_) => "categories",
        ContentPayload::Aggregate(_) => "aggregate",
    }
}

fn failed(component: ResolvedComponent, err: &HydrationError) -> ResolvedComponent {
    let data_type = component.config.dynamic_data.as_ref().map(|d| d.data_type.as_str());
    warn!(
        component = %component.id,
        data_type,
        kind = err.kind(),
        error = %err,
        "Component data unavailable"
    );
    let marker = DataErrorMarker { kind: err.kind().to_owned(), message: err.to_string() };
    component.with_failure(marker)
}
