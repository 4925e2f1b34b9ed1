use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use schemareg_core::ledger::{DeviationSelection, FeatureSelection};
use schemareg_core::model::{
    parse_revision, LanguageVersion, Module, NodeRef, QName, SchemaNode, SchemaPath, SchemaTree,
    TypeDefinition, UniqueConstraint,
};
use schemareg_core::{RegistryConfig, Result, SchemaError, SchemaSource};
use schemareg_engine::{ModuleSetListener, SchemaRegistry, SchemaSourceParser};

pub const ROUTER_NS: &str = "urn:acme:router";
pub const QOS_NS: &str = "urn:acme:qos";
pub const TELEMETRY_NS: &str = "urn:acme:telemetry";

/// Source content that makes the fixture parser fail
#[allow(dead_code)]
pub const INVALID_CONTENT: &str = "!invalid";

#[allow(dead_code)]
pub fn rq(name: &str) -> QName {
    QName::with_revision(ROUTER_NS, parse_revision("2024-01-15").unwrap(), name)
}

#[allow(dead_code)]
pub fn qq(name: &str) -> QName {
    QName::new(QOS_NS, name)
}

#[allow(dead_code)]
pub fn router_path(names: &[&str]) -> SchemaPath {
    SchemaPath::from_qnames(names.iter().map(|n| rq(n)).collect()).unwrap()
}

#[allow(dead_code)]
pub fn qos_path(names: &[&str]) -> SchemaPath {
    SchemaPath::from_qnames(names.iter().map(|n| qq(n)).collect()).unwrap()
}

fn string_leaf(at: SchemaPath) -> NodeRef {
    SchemaNode::leaf(at, TypeDefinition::builtin(QName::new("urn:builtin", "string")))
}

/// interfaces/interface[name]{name, mtu}, routing/default-interface (leafref)
fn router_module() -> Module {
    let interface = router_path(&["interfaces", "interface"]);
    let routing = router_path(&["routing"]);

    let mut module = Module::new("acme-router", ROUTER_NS, "acme", parse_revision("2024-01-15"));
    module.features = vec!["jumbo-frames".to_string()];
    module.data_children = vec![
        SchemaNode::container(
            router_path(&["interfaces"]),
            vec![SchemaNode::list(
                interface.clone(),
                vec![rq("name")],
                vec![
                    string_leaf(interface.child(rq("name"))),
                    string_leaf(interface.child(rq("mtu"))),
                ],
            )],
        ),
        SchemaNode::container(
            routing.clone(),
            vec![SchemaNode::leaf(
                routing.child(rq("default-interface")),
                TypeDefinition::leafref(rq("leafref"), "../../interfaces/interface/name"),
            )],
        ),
    ];
    module
}

/// qos/policy[name]{name, rate}
fn qos_module() -> Module {
    let policy = qos_path(&["qos", "policy"]);
    let mut module = Module::new("acme-qos", QOS_NS, "qos", None);
    module.features = vec!["priority".to_string(), "shaping".to_string()];
    module.data_children = vec![SchemaNode::container(
        qos_path(&["qos"]),
        vec![SchemaNode::list(
            policy.clone(),
            vec![qq("name")],
            vec![
                string_leaf(policy.child(qq("name"))),
                string_leaf(policy.child(qq("rate"))),
            ],
        )],
    )];
    module
}

/// Deviates the qos module
fn qos_deviations_module() -> Module {
    let mut module = Module::new("acme-qos-deviations", "urn:acme:qos-deviations", "qosdev", None);
    module.deviation_targets = vec![QOS_NS.to_string()];
    module
}

fn telemetry_module() -> Module {
    let mut module = Module::new("acme-telemetry", TELEMETRY_NS, "tel", None);
    module.language_version = LanguageVersion::V1_1;
    module.data_children = vec![string_leaf(SchemaPath::root(QName::new(
        TELEMETRY_NS,
        "sample-rate",
    )))];
    module
}

/// Defines /acme:interfaces a second time
fn clash_module() -> Module {
    let mut module = Module::new("acme-clash", "urn:acme:clash", "clash", None);
    module.data_children = vec![SchemaNode::container(router_path(&["interfaces"]), vec![])];
    module
}

/// A list whose unique tag names a node in another namespace
fn bad_unique_module() -> Module {
    let ns = "urn:acme:bad-unique";
    let list_path = SchemaPath::root(QName::new(ns, "peers")).child(QName::new(ns, "peer"));
    let list = SchemaNode::list(
        list_path.clone(),
        vec![QName::new(ns, "id")],
        vec![string_leaf(list_path.child(QName::new(ns, "id")))],
    );
    let mut list = list.as_list().cloned().unwrap();
    list.unique = vec![UniqueConstraint {
        tags: vec![vec![QName::new("urn:acme:other", "id")]],
    }];

    let mut module = Module::new("acme-bad-unique", ns, "bad", None);
    module.data_children = vec![SchemaNode::container(
        SchemaPath::root(QName::new(ns, "peers")),
        vec![Arc::new(SchemaNode::List(list))],
    )];
    module
}

/// Maps source names to fixture modules
///
/// Unknown names and sources whose content is [`INVALID_CONTENT`] are
/// rejected with a parse error.
#[derive(Default)]
pub struct FixtureParser {
    parse_count: AtomicUsize,
}

impl FixtureParser {
    #[allow(dead_code)]
    pub fn parse_count(&self) -> usize {
        self.parse_count.load(Ordering::SeqCst)
    }
}

impl SchemaSourceParser for FixtureParser {
    fn parse(&self, sources: &[SchemaSource]) -> Result<SchemaTree> {
        self.parse_count.fetch_add(1, Ordering::SeqCst);
        let mut modules = Vec::new();
        for source in sources {
            if &*source.content == INVALID_CONTENT {
                return Err(SchemaError::Parse {
                    message: format!("{}: unexpected token", source.name),
                });
            }
            let mut module = match source.name.as_str() {
                "acme-router.yang" => router_module(),
                "acme-qos.yang" => qos_module(),
                "acme-qos-deviations.yang" => qos_deviations_module(),
                "acme-telemetry.yang" => telemetry_module(),
                "acme-clash.yang" => clash_module(),
                "acme-bad-unique.yang" => bad_unique_module(),
                other => {
                    return Err(SchemaError::Parse {
                        message: format!("{}: no such module", other),
                    })
                }
            };
            module.source = source.name.clone();
            modules.push(module);
        }
        Ok(SchemaTree::new(modules))
    }
}

#[allow(dead_code)]
pub fn source(name: &str) -> SchemaSource {
    SchemaSource::new(name, "module")
}

#[allow(dead_code)]
pub fn no_features() -> Option<FeatureSelection> {
    Some(BTreeMap::new())
}

#[allow(dead_code)]
pub fn no_deviations() -> Option<DeviationSelection> {
    Some(BTreeMap::new())
}

#[allow(dead_code)]
pub fn select(namespace: &str, names: &[&str]) -> Option<BTreeMap<String, BTreeSet<String>>> {
    let mut selection = BTreeMap::new();
    selection.insert(
        namespace.to_string(),
        names.iter().map(|n| n.to_string()).collect(),
    );
    Some(selection)
}

#[allow(dead_code)]
pub fn registry() -> (SchemaRegistry, Arc<FixtureParser>) {
    registry_with(RegistryConfig::default())
}

#[allow(dead_code)]
pub fn registry_with(config: RegistryConfig) -> (SchemaRegistry, Arc<FixtureParser>) {
    let parser = Arc::new(FixtureParser::default());
    (SchemaRegistry::new(parser.clone(), config), parser)
}

/// Registry with the router module as its base
#[allow(dead_code)]
pub fn router_registry() -> (SchemaRegistry, Arc<FixtureParser>) {
    let (registry, parser) = registry();
    registry
        .build_schema_context(vec![source("acme-router.yang")], None, None)
        .unwrap();
    (registry, parser)
}

/// Records every module-set change it is told about
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingListener {
    pub changes: Mutex<Vec<(String, String)>>,
}

impl ModuleSetListener for RecordingListener {
    fn module_set_changed(&self, previous_id: &str, current_id: &str) {
        self.changes
            .lock()
            .unwrap()
            .push((previous_id.to_string(), current_id.to_string()));
    }
}
