//! The registry façade.
//!
//! [`Registry`] composes the storage engine, the id allocator, the audit
//! ledger, and per-kind in-memory caches into the API the application
//! handlers call. The caches mirror the live stores and are explicit
//! fields, not ambient globals, and they are only updated after the
//! corresponding storage write committed, so a failed mutation never
//! leaves an optimistic cache entry behind.

use parking_lot::RwLock;
use patrimonio_storage::error::{CommitSnafu, TableSnafu};
use patrimonio_storage::{EntityStore, IndexStore, StorageEngine, TrashStore, Tables};
use patrimonio_types::config::CoreConfig;
use patrimonio_types::validation::{
    validate_display_name, validate_postal_code, validate_tax_id, ValidationError,
};
use patrimonio_types::{
    AnalysisReport, CloudAccount, Document, Employee, EntityId, EntityKind, EntityRecord,
    LogAction, LogEntry, LogScope, MonthlyRecord, Owner, Property, Tag, TrashItem,
};
use snafu::ResultExt;
use tracing::warn;

use crate::allocator::IdAllocator;
use crate::error::{IoSnafu, RegistryError, Result};
use crate::ledger::AuditLedger;
use crate::merge::merge_indices;

/// Per-kind in-memory mirrors of the live stores, newest-first.
pub(crate) struct Caches {
    pub(crate) properties: RwLock<Vec<Property>>,
    pub(crate) owners: RwLock<Vec<Owner>>,
    pub(crate) documents: RwLock<Vec<Document>>,
    pub(crate) employees: RwLock<Vec<Employee>>,
    pub(crate) tags: RwLock<Vec<Tag>>,
    pub(crate) cloud_accounts: RwLock<Vec<CloudAccount>>,
    pub(crate) trash: RwLock<Vec<TrashItem>>,
}

/// The registry: entity CRUD, audit, trash, and index history.
pub struct Registry {
    pub(crate) engine: StorageEngine,
    allocator: IdAllocator,
    pub(crate) ledger: AuditLedger,
    pub(crate) caches: Caches,
}

impl Registry {
    /// Opens a registry at the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns a config, I/O, or storage error if the directory or the
    /// database cannot be prepared.
    pub fn open(config: &CoreConfig) -> Result<Self> {
        config.validate()?;
        std::fs::create_dir_all(&config.data_dir)
            .context(IoSnafu { path: config.data_dir.clone() })?;

        let engine = StorageEngine::open(config.data_dir.join("registry.redb"))?;
        Ok(Self::with_engine(engine, config.user_display_name.clone()))
    }

    /// Opens an in-memory registry. Intended for tests.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the in-memory database cannot be created.
    pub fn open_in_memory(user_display_name: impl Into<String>) -> Result<Self> {
        let engine = StorageEngine::open_in_memory()?;
        Ok(Self::with_engine(engine, user_display_name))
    }

    /// Builds a registry over an already-open engine, loading the caches.
    #[must_use]
    pub fn with_engine(engine: StorageEngine, user_display_name: impl Into<String>) -> Self {
        let allocator = IdAllocator::new(&engine);
        let ledger = AuditLedger::new(&engine, allocator.clone(), user_display_name);
        let caches = Self::load_caches(&engine);

        Self { engine, allocator, ledger, caches }
    }

    /// Loads every cache, isolating failures per kind: a kind that fails to
    /// load starts empty and is diagnosed, without affecting the others.
    fn load_caches(engine: &StorageEngine) -> Caches {
        let mut properties = Vec::new();
        let mut owners = Vec::new();
        let mut documents = Vec::new();
        let mut employees = Vec::new();
        let mut tags = Vec::new();
        let mut cloud_accounts = Vec::new();
        let mut trash = Vec::new();

        match engine.read() {
            Ok(txn) => {
                match txn.open_table(Tables::ENTITIES) {
                    Ok(table) => {
                        for kind in EntityKind::ALL {
                            if kind == EntityKind::Log {
                                continue;
                            }
                            let records = match EntityStore::list_kind(&table, kind) {
                                Ok(records) => records,
                                Err(err) => {
                                    warn!(kind = %kind, error = %err, "failed to load entities; kind starts empty");
                                    continue;
                                }
                            };
                            for record in records {
                                match record {
                                    EntityRecord::Property(p) => properties.push(p),
                                    EntityRecord::Owner(o) => owners.push(o),
                                    EntityRecord::Document(d) => documents.push(d),
                                    EntityRecord::Employee(e) => employees.push(e),
                                    EntityRecord::Tag(t) => tags.push(t),
                                    EntityRecord::CloudAccount(c) => cloud_accounts.push(c),
                                }
                            }
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "failed to open entities table; caches start empty");
                    }
                }

                match txn.open_table(Tables::TRASH) {
                    Ok(table) => match TrashStore::list(&table) {
                        Ok(items) => trash = items,
                        Err(err) => {
                            warn!(error = %err, "failed to load trash; starts empty");
                        }
                    },
                    Err(err) => {
                        warn!(error = %err, "failed to open trash table; starts empty");
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to begin startup read; caches start empty");
            }
        }

        // Live stores are served newest-first.
        properties.reverse();
        owners.reverse();
        documents.reverse();
        employees.reverse();
        tags.reverse();
        cloud_accounts.reverse();
        trash.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));

        Caches {
            properties: RwLock::new(properties),
            owners: RwLock::new(owners),
            documents: RwLock::new(documents),
            employees: RwLock::new(employees),
            tags: RwLock::new(tags),
            cloud_accounts: RwLock::new(cloud_accounts),
            trash: RwLock::new(trash),
        }
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    /// Creates an entity: allocates its id, persists the record built from
    /// that id, then records a `Create` log entry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnsupportedKind`] for the `Log` kind,
    /// [`RegistryError::IdMismatch`] if the built record does not carry the
    /// allocated id, a validation error for an unusable display name, or a
    /// storage error. In every failure case nothing was persisted or cached.
    pub fn create_with<F>(&self, kind: EntityKind, build: F) -> Result<EntityRecord>
    where
        F: FnOnce(EntityId) -> EntityRecord,
    {
        if kind == EntityKind::Log {
            return Err(RegistryError::UnsupportedKind { kind });
        }

        let id = self.allocator.allocate(kind)?;
        let record = build(id);
        if record.id() != id {
            return Err(RegistryError::IdMismatch { expected: id, found: record.id() });
        }
        validate_record(&record)?;

        let txn = self.engine.write()?;
        {
            let mut table = txn.open_table(Tables::ENTITIES).context(TableSnafu)?;
            EntityStore::set(&mut table, &record)?;
        }
        txn.commit().context(CommitSnafu)?;

        self.cache_upsert(record.clone());
        self.ledger.record(
            LogAction::Create,
            scope_for(kind),
            format!("Criação de {} '{}'", kind_label(kind), record.display_name()),
            None,
        );

        Ok(record)
    }

    /// Overwrites an existing entity with new field values.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the entity is not live, a
    /// validation error for an unusable display name, or a storage error.
    /// In every failure case neither store nor cache changed.
    pub fn update(&self, record: EntityRecord) -> Result<()> {
        let id = record.id();
        validate_record(&record)?;

        let txn = self.engine.write()?;
        {
            let mut table = txn.open_table(Tables::ENTITIES).context(TableSnafu)?;
            if !EntityStore::exists(&table, id)? {
                return Err(RegistryError::NotFound { id });
            }
            EntityStore::set(&mut table, &record)?;
        }
        txn.commit().context(CommitSnafu)?;

        self.cache_upsert(record.clone());
        self.ledger.record(
            LogAction::Update,
            scope_for(id.kind()),
            format!("Atualização de {} '{}'", kind_label(id.kind()), record.display_name()),
            None,
        );

        Ok(())
    }

    /// Returns a live entity by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails.
    pub fn get(&self, id: EntityId) -> Result<Option<EntityRecord>> {
        let txn = self.engine.read()?;
        let table = txn.open_table(Tables::ENTITIES).context(TableSnafu)?;
        Ok(EntityStore::get(&table, id)?)
    }

    // ========================================================================
    // Cache accessors (newest-first snapshots)
    // ========================================================================

    /// Live properties, newest first.
    #[must_use]
    pub fn properties(&self) -> Vec<Property> {
        self.caches.properties.read().clone()
    }

    /// Live owners, newest first.
    #[must_use]
    pub fn owners(&self) -> Vec<Owner> {
        self.caches.owners.read().clone()
    }

    /// Live documents, newest first.
    #[must_use]
    pub fn documents(&self) -> Vec<Document> {
        self.caches.documents.read().clone()
    }

    /// Live employees, newest first.
    #[must_use]
    pub fn employees(&self) -> Vec<Employee> {
        self.caches.employees.read().clone()
    }

    /// Live tags, newest first.
    #[must_use]
    pub fn tags(&self) -> Vec<Tag> {
        self.caches.tags.read().clone()
    }

    /// Live cloud accounts, newest first.
    #[must_use]
    pub fn cloud_accounts(&self) -> Vec<CloudAccount> {
        self.caches.cloud_accounts.read().clone()
    }

    /// Trash items, most recently deleted first.
    #[must_use]
    pub fn trash_items(&self) -> Vec<TrashItem> {
        self.caches.trash.read().clone()
    }

    /// Audit log snapshot, newest first.
    #[must_use]
    pub fn audit_log(&self) -> Vec<LogEntry> {
        self.ledger.entries()
    }

    /// The audit ledger.
    #[must_use]
    pub fn ledger(&self) -> &AuditLedger {
        &self.ledger
    }

    /// The id allocator.
    #[must_use]
    pub fn allocator(&self) -> &IdAllocator {
        &self.allocator
    }

    // ========================================================================
    // Document analysis
    // ========================================================================

    /// Applies an analysis report to a stored document and records an
    /// `Analysis` log entry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the id is not a live entity,
    /// [`RegistryError::UnsupportedKind`] if it is not a document, or a
    /// storage error.
    pub fn register_document_analysis(
        &self,
        document_id: EntityId,
        report: &AnalysisReport,
    ) -> Result<Document> {
        if document_id.kind() != EntityKind::Document {
            return Err(RegistryError::UnsupportedKind { kind: document_id.kind() });
        }

        let txn = self.engine.write()?;
        let updated;
        {
            let mut table = txn.open_table(Tables::ENTITIES).context(TableSnafu)?;
            let record = EntityStore::get(&table, document_id)?
                .ok_or(RegistryError::NotFound { id: document_id })?;

            let mut document = match record {
                EntityRecord::Document(document) => document,
                other => {
                    return Err(RegistryError::UnsupportedKind { kind: other.kind() });
                }
            };

            document.category = report.category.clone();
            document.risk_level = report.risk_level;
            document.summary =
                (!report.summary.is_empty()).then(|| report.summary.clone());

            EntityStore::set(&mut table, &EntityRecord::Document(document.clone()))?;
            updated = document;
        }
        txn.commit().context(CommitSnafu)?;

        self.cache_upsert(EntityRecord::Document(updated.clone()));
        self.ledger.record(
            LogAction::Analysis,
            LogScope::Document,
            format!("Análise de Documento '{}'", updated.name),
            Some(format!(
                "categoria: {}; risco: {}",
                updated.category,
                updated.risk_level.as_str()
            )),
        );

        Ok(updated)
    }

    // ========================================================================
    // Monthly indices
    // ========================================================================

    /// Returns the stored index history, most recent month first.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails.
    pub fn monthly_indices(&self) -> Result<Vec<MonthlyRecord>> {
        let txn = self.engine.read()?;
        let table = txn.open_table(Tables::INDICES).context(TableSnafu)?;
        Ok(IndexStore::list_desc(&table)?)
    }

    /// Merges freshly fetched records into the stored history and persists
    /// the merged result.
    ///
    /// # Errors
    ///
    /// Returns a storage error; the held history is unchanged in that case.
    pub fn merge_monthly_indices(&self, incoming: &[MonthlyRecord]) -> Result<Vec<MonthlyRecord>> {
        let existing = self.monthly_indices()?;
        let merged = merge_indices(&existing, incoming);

        let txn = self.engine.write()?;
        {
            let mut table = txn.open_table(Tables::INDICES).context(TableSnafu)?;
            IndexStore::upsert(&mut table, &merged)?;
        }
        txn.commit().context(CommitSnafu)?;

        self.ledger.record(
            LogAction::Update,
            LogScope::System,
            "Atualização de índices mensais",
            Some(format!("{} meses no histórico", merged.len())),
        );

        Ok(merged)
    }

    // ========================================================================
    // Administration
    // ========================================================================

    /// Clears every id counter. Administrative-only; see
    /// [`IdAllocator::reset_counters`].
    ///
    /// # Errors
    ///
    /// Returns a storage error if the clear cannot be committed.
    pub fn reset_counters(&self) -> Result<()> {
        self.allocator.reset_counters()
    }

    // ========================================================================
    // Cache maintenance
    // ========================================================================

    /// Inserts or replaces a record in its kind cache, keeping newest-first
    /// (descending sequence) order.
    pub(crate) fn cache_upsert(&self, record: EntityRecord) {
        match record {
            EntityRecord::Property(p) => upsert_sorted(&self.caches.properties, p, |x| x.id),
            EntityRecord::Owner(o) => upsert_sorted(&self.caches.owners, o, |x| x.id),
            EntityRecord::Document(d) => upsert_sorted(&self.caches.documents, d, |x| x.id),
            EntityRecord::Employee(e) => upsert_sorted(&self.caches.employees, e, |x| x.id),
            EntityRecord::Tag(t) => upsert_sorted(&self.caches.tags, t, |x| x.id),
            EntityRecord::CloudAccount(c) => {
                upsert_sorted(&self.caches.cloud_accounts, c, |x| x.id)
            }
        }
    }

    /// Removes an id from its kind cache.
    pub(crate) fn cache_remove(&self, id: EntityId) {
        match id.kind() {
            EntityKind::Property => self.caches.properties.write().retain(|x| x.id != id),
            EntityKind::Owner => self.caches.owners.write().retain(|x| x.id != id),
            EntityKind::Document => self.caches.documents.write().retain(|x| x.id != id),
            EntityKind::Employee => self.caches.employees.write().retain(|x| x.id != id),
            EntityKind::Tag => self.caches.tags.write().retain(|x| x.id != id),
            EntityKind::CloudAccount => {
                self.caches.cloud_accounts.write().retain(|x| x.id != id)
            }
            EntityKind::Log => {}
        }
    }
}

/// Maps an entity kind to the log scope its entries are filed under.
///
/// Cloud accounts have no dedicated scope; their actions are system-level.
pub(crate) fn scope_for(kind: EntityKind) -> LogScope {
    match kind {
        EntityKind::Property => LogScope::Property,
        EntityKind::Owner => LogScope::Owner,
        EntityKind::Document => LogScope::Document,
        EntityKind::Employee => LogScope::Employee,
        EntityKind::Tag => LogScope::Tag,
        EntityKind::CloudAccount | EntityKind::Log => LogScope::System,
    }
}

/// Portuguese display label used in log descriptions.
pub(crate) fn kind_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Property => "Imóvel",
        EntityKind::Owner => "Proprietário",
        EntityKind::Document => "Documento",
        EntityKind::Employee => "Colaborador",
        EntityKind::Tag => "Etiqueta",
        EntityKind::CloudAccount => "Conta de nuvem",
        EntityKind::Log => "Registro",
    }
}

/// Validates the domain fields of a record before it is persisted.
///
/// Display names are always checked. Postal codes and tax ids are optional
/// fields; when present they must be well-formed.
fn validate_record(record: &EntityRecord) -> std::result::Result<(), ValidationError> {
    validate_display_name(record.display_name())?;

    match record {
        EntityRecord::Property(property) => {
            if !property.address.postal_code.is_empty() {
                validate_postal_code(&property.address.postal_code)?;
            }
        }
        EntityRecord::Owner(owner) => {
            if let Some(tax_id) = &owner.tax_id {
                validate_tax_id(tax_id)?;
            }
        }
        EntityRecord::Document(_)
        | EntityRecord::Employee(_)
        | EntityRecord::Tag(_)
        | EntityRecord::CloudAccount(_) => {}
    }

    Ok(())
}

/// Inserts or replaces by id, then restores descending-sequence order.
fn upsert_sorted<T>(lock: &RwLock<Vec<T>>, item: T, id_of: fn(&T) -> EntityId) {
    let mut guard = lock.write();
    guard.retain(|existing| id_of(existing) != id_of(&item));
    guard.push(item);
    guard.sort_by(|a, b| id_of(b).seq().cmp(&id_of(a).seq()));
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use patrimonio_types::{Address, RiskLevel};

    fn registry() -> Registry {
        Registry::open_in_memory("Ana").expect("open")
    }

    fn new_property(registry: &Registry, name: &str) -> Property {
        let record = registry
            .create_with(EntityKind::Property, |id| {
                EntityRecord::Property(Property {
                    id,
                    name: name.to_string(),
                    address: Address::default(),
                    owner: None,
                    tags: Vec::new(),
                    appraised_value: None,
                    registered_at: Utc::now(),
                })
            })
            .expect("create property");
        match record {
            EntityRecord::Property(p) => p,
            other => panic!("expected property, got {other:?}"),
        }
    }

    fn new_document(registry: &Registry, name: &str) -> Document {
        let record = registry
            .create_with(EntityKind::Document, |id| {
                EntityRecord::Document(Document {
                    id,
                    name: name.to_string(),
                    property: None,
                    category: "Sem categoria".to_string(),
                    risk_level: RiskLevel::Low,
                    summary: None,
                    uploaded_at: Utc::now(),
                })
            })
            .expect("create document");
        match record {
            EntityRecord::Document(d) => d,
            other => panic!("expected document, got {other:?}"),
        }
    }

    #[test]
    fn test_create_allocates_sequential_ids() {
        let registry = registry();

        let a = new_property(&registry, "Galpão A");
        let b = new_property(&registry, "Galpão B");
        let c = new_property(&registry, "Galpão C");

        assert_eq!(a.id.to_string(), "I_1");
        assert_eq!(b.id.to_string(), "I_2");
        assert_eq!(c.id.to_string(), "I_3");
    }

    #[test]
    fn test_create_appears_in_cache_newest_first() {
        let registry = registry();
        new_property(&registry, "Primeiro");
        new_property(&registry, "Segundo");

        let names: Vec<String> =
            registry.properties().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Segundo", "Primeiro"]);
    }

    #[test]
    fn test_create_records_log_entry() {
        let registry = registry();
        new_property(&registry, "Galpão");

        let log = registry.audit_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action, LogAction::Create);
        assert_eq!(log[0].scope, LogScope::Property);
        assert!(log[0].description.contains("Galpão"));
        assert_eq!(log[0].user_name, "Ana");
    }

    #[test]
    fn test_create_rejects_log_kind() {
        let registry = registry();
        let result = registry.create_with(EntityKind::Log, |id| {
            EntityRecord::Tag(Tag { id, label: "x".into(), color: "#fff".into() })
        });
        assert!(matches!(result, Err(RegistryError::UnsupportedKind { .. })));
    }

    #[test]
    fn test_create_rejects_id_mismatch() {
        let registry = registry();
        let result = registry.create_with(EntityKind::Tag, |_| {
            EntityRecord::Tag(Tag {
                id: EntityId::new(EntityKind::Tag, 99),
                label: "x".into(),
                color: "#fff".into(),
            })
        });
        assert!(matches!(result, Err(RegistryError::IdMismatch { .. })));
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let registry = registry();
        let result = registry.create_with(EntityKind::Tag, |id| {
            EntityRecord::Tag(Tag { id, label: "  ".into(), color: "#fff".into() })
        });
        assert!(matches!(result, Err(RegistryError::Validation { .. })));
        assert!(registry.tags().is_empty(), "nothing cached on failure");
    }

    #[test]
    fn test_create_rejects_malformed_postal_code() {
        let registry = registry();
        let result = registry.create_with(EntityKind::Property, |id| {
            EntityRecord::Property(Property {
                id,
                name: "Galpão".to_string(),
                address: Address {
                    street: String::new(),
                    city: String::new(),
                    state: String::new(),
                    postal_code: "123".to_string(),
                },
                owner: None,
                tags: Vec::new(),
                appraised_value: None,
                registered_at: Utc::now(),
            })
        });
        assert!(matches!(result, Err(RegistryError::Validation { .. })));
        assert!(registry.properties().is_empty());
    }

    #[test]
    fn test_create_owner_checks_tax_id() {
        let registry = registry();

        let valid = registry.create_with(EntityKind::Owner, |id| {
            EntityRecord::Owner(Owner {
                id,
                name: "ACME Ltda".to_string(),
                tax_id: Some("11222333000181".to_string()),
                email: None,
                phone: None,
            })
        });
        assert!(valid.is_ok());

        let invalid = registry.create_with(EntityKind::Owner, |id| {
            EntityRecord::Owner(Owner {
                id,
                name: "Fantasma SA".to_string(),
                tax_id: Some("11222333000199".to_string()),
                email: None,
                phone: None,
            })
        });
        assert!(matches!(invalid, Err(RegistryError::Validation { .. })));
        assert_eq!(registry.owners().len(), 1);
    }

    #[test]
    fn test_update_overwrites_and_logs() {
        let registry = registry();
        let mut property = new_property(&registry, "Galpão");

        property.name = "Galpão Reformado".to_string();
        registry.update(EntityRecord::Property(property.clone())).expect("update");

        let stored = registry.get(property.id).expect("get").expect("present");
        assert_eq!(stored.display_name(), "Galpão Reformado");

        let log = registry.audit_log();
        assert_eq!(log[0].action, LogAction::Update);
    }

    #[test]
    fn test_update_missing_entity_fails() {
        let registry = registry();
        let ghost = Property {
            id: EntityId::new(EntityKind::Property, 9),
            name: "Fantasma".to_string(),
            address: Address::default(),
            owner: None,
            tags: Vec::new(),
            appraised_value: None,
            registered_at: Utc::now(),
        };
        let result = registry.update(EntityRecord::Property(ghost));
        assert!(matches!(result, Err(RegistryError::NotFound { .. })));
    }

    #[test]
    fn test_get_returns_none_for_absent_id() {
        let registry = registry();
        let found = registry.get(EntityId::new(EntityKind::Owner, 4)).expect("get");
        assert!(found.is_none());
    }

    #[test]
    fn test_caches_reload_from_storage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = CoreConfig::builder()
            .data_dir(dir.path())
            .user_display_name("Ana")
            .build();

        {
            let registry = Registry::open(&config).expect("open");
            new_property(&registry, "Persistido");
        }

        let registry = Registry::open(&config).expect("reopen");
        let properties = registry.properties();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].name, "Persistido");
    }

    #[test]
    fn test_register_document_analysis_updates_document() {
        let registry = registry();
        let document = new_document(&registry, "contrato.pdf");

        let mut report = AnalysisReport::fallback();
        report.category = "Contrato de Locação".to_string();
        report.summary = "Aluguel com reajuste anual".to_string();
        report.risk_level = RiskLevel::Medium;

        let updated =
            registry.register_document_analysis(document.id, &report).expect("analysis");
        assert_eq!(updated.category, "Contrato de Locação");
        assert_eq!(updated.risk_level, RiskLevel::Medium);
        assert_eq!(updated.summary.as_deref(), Some("Aluguel com reajuste anual"));

        let log = registry.audit_log();
        assert_eq!(log[0].action, LogAction::Analysis);
        assert_eq!(log[0].scope, LogScope::Document);
    }

    #[test]
    fn test_register_document_analysis_rejects_non_document() {
        let registry = registry();
        let property = new_property(&registry, "Galpão");

        let report = AnalysisReport::fallback();
        let result = registry.register_document_analysis(property.id, &report);
        assert!(matches!(result, Err(RegistryError::UnsupportedKind { .. })));
    }

    #[test]
    fn test_merge_monthly_indices_persists_merged_history() {
        let registry = registry();

        let first = vec![MonthlyRecord {
            date: "2025-06".to_string(),
            indices: [("IPCA".to_string(), 0.26), ("IGPM".to_string(), 0.1)].into(),
        }];
        registry.merge_monthly_indices(&first).expect("merge");

        let second = vec![MonthlyRecord {
            date: "2025-06".to_string(),
            indices: [("IPCA".to_string(), 0.31)].into(),
        }];
        let merged = registry.merge_monthly_indices(&second).expect("merge");

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].indices.get("IPCA"), Some(&0.31));
        assert_eq!(merged[0].indices.get("IGPM"), Some(&0.1));

        let stored = registry.monthly_indices().expect("list");
        assert_eq!(stored, merged);
    }

    #[test]
    fn test_reset_counters_restarts_allocation() {
        let registry = registry();
        new_property(&registry, "Galpão");
        registry.reset_counters().expect("reset");

        let id = registry.allocator().allocate(EntityKind::Property).expect("allocate");
        assert_eq!(id.to_string(), "I_1");
    }
}
