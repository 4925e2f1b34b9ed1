use schemareg_core::model::{
    parse_revision, Grouping, LanguageVersion, LocalDefinitions, Module, NodeRef, QName,
    SchemaNode, SchemaPath, SchemaTree, TypeDefinition,
};
use std::sync::Arc;

pub const ACME_NS: &str = "urn:acme:router";

/// Qualified name in the acme namespace, revision 2024-01-15
#[allow(dead_code)]
pub fn q(name: &str) -> QName {
    QName::with_revision(ACME_NS, parse_revision("2024-01-15").unwrap(), name)
}

/// Absolute acme path from local names
#[allow(dead_code)]
pub fn path(names: &[&str]) -> SchemaPath {
    SchemaPath::from_qnames(names.iter().map(|n| q(n)).collect()).unwrap()
}

#[allow(dead_code)]
pub fn string_leaf(at: SchemaPath) -> NodeRef {
    SchemaNode::leaf(at, TypeDefinition::builtin(q("string")))
}

/// Router model:
///
/// ```text
/// interfaces
///   interface [name]
///     name, mtu
///     choice address-type { case v4 { ipv4 } case v6 { ipv6 } }
///     action reset { input { delay } output { result } }
///     notification link-down { reason }
/// routing
///   default-interface  (leafref ../../interfaces/interface/name)
/// rpc reboot { input { delay } }
/// notification restarted { uptime }
/// identity ethernet
/// ```
#[allow(dead_code)]
pub fn router_module() -> Module {
    let interfaces = path(&["interfaces"]);
    let interface = interfaces.child(q("interface"));
    let choice = interface.child(q("address-type"));
    let v4 = choice.child(q("v4"));
    let v6 = choice.child(q("v6"));
    let reset = interface.child(q("reset"));
    let link_down = interface.child(q("link-down"));

    let list_node = SchemaNode::list(
        interface.clone(),
        vec![q("name")],
        vec![
            string_leaf(interface.child(q("name"))),
            string_leaf(interface.child(q("mtu"))),
            SchemaNode::choice(
                choice,
                vec![
                    SchemaNode::case(v4.clone(), vec![string_leaf(v4.child(q("ipv4")))]),
                    SchemaNode::case(v6.clone(), vec![string_leaf(v6.child(q("ipv6")))]),
                ],
            ),
        ],
    );
    let mut list = list_node.as_list().cloned().unwrap();
    list.actions.push(SchemaNode::operation(
        reset.clone(),
        Some(SchemaNode::container(
            reset.child(q("input")),
            vec![string_leaf(reset.child(q("input")).child(q("delay")))],
        )),
        Some(SchemaNode::container(
            reset.child(q("output")),
            vec![string_leaf(reset.child(q("output")).child(q("result")))],
        )),
        false,
    ));
    list.notifications.push(SchemaNode::notification(
        link_down.clone(),
        vec![string_leaf(link_down.child(q("reason")))],
    ));
    list.definitions = LocalDefinitions {
        groupings: vec![Grouping {
            name: q("counters"),
            children: vec![string_leaf(path(&["counters", "in-octets"]))],
            definitions: LocalDefinitions::default(),
        }],
        typedefs: vec![TypeDefinition::builtin(q("mtu-type"))],
    };

    let routing = path(&["routing"]);
    let reboot = path(&["reboot"]);

    let mut module = Module::new("acme-router", ACME_NS, "acme", parse_revision("2024-01-15"));
    module.features = vec!["jumbo-frames".to_string(), "ipv6".to_string()];
    module.data_children = vec![
        SchemaNode::container(interfaces, vec![Arc::new(SchemaNode::List(list))]),
        SchemaNode::container(
            routing.clone(),
            vec![SchemaNode::leaf(
                routing.child(q("default-interface")),
                TypeDefinition::leafref(q("leafref"), "../../interfaces/interface/name"),
            )],
        ),
    ];
    module.rpcs = vec![SchemaNode::operation(
        reboot.clone(),
        Some(SchemaNode::container(
            reboot.child(q("input")),
            vec![string_leaf(reboot.child(q("input")).child(q("delay")))],
        )),
        None,
        true,
    )];
    module.notifications = vec![SchemaNode::notification(
        path(&["restarted"]),
        vec![string_leaf(path(&["restarted", "uptime"]))],
    )];
    module.identities = vec![Arc::new(SchemaNode::Identity(
        schemareg_core::model::IdentityNode {
            path: path(&["ethernet"]),
            bases: Vec::new(),
        },
    ))];
    module.source = "acme-router.yang".to_string();
    module
}

/// A small module written in language version 1.1
#[allow(dead_code)]
pub fn telemetry_module() -> Module {
    let ns = "urn:acme:telemetry";
    let mut module = Module::new("acme-telemetry", ns, "tel", None);
    module.language_version = LanguageVersion::V1_1;
    module.data_children = vec![string_leaf(SchemaPath::root(QName::new(ns, "sample-rate")))];
    module.source = "acme-telemetry.yang".to_string();
    module
}

#[allow(dead_code)]
pub fn router_tree() -> SchemaTree {
    SchemaTree::new(vec![router_module()])
}
