//! Resource graph tests over a full project
//!
//! Run with: cargo test --test graph_tests

mod common;

use common::{shop_project, single_deployment};
use kubeforge_api::graph::CANVAS_PADDING;
use kubeforge_api::{build_graph, build_resource_graph, graph_edges, render_node_yaml};
use kubeforge_common::{FlowNode, GraphFilter, NodeKind, NodeStatus, SyncStatus};
use std::collections::HashSet;

fn find<'a>(nodes: &'a [FlowNode], id: &str) -> &'a FlowNode {
    nodes
        .iter()
        .find(|n| n.id == id)
        .unwrap_or_else(|| panic!("missing node {}", id))
}

fn ids(nodes: &[FlowNode]) -> HashSet<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

#[test]
fn test_ids_unique_and_edges_resolve() {
    let graph = build_graph(&shop_project(), GraphFilter::All, None);
    let known = ids(&graph.nodes);

    assert_eq!(known.len(), graph.nodes.len(), "duplicate node ids");
    for edge in &graph.edges {
        assert!(known.contains(edge.from.as_str()), "dangling edge source {}", edge.from);
        assert!(known.contains(edge.to.as_str()), "dangling edge target {}", edge.to);
    }
}

#[test]
fn test_shop_workload_row() {
    let nodes = build_resource_graph(&shop_project(), GraphFilter::All, None);

    let web = find(&nodes, "deployment-shop-web");
    assert_eq!(web.status, NodeStatus::Healthy);
    assert_eq!(web.sync_status, SyncStatus::Synced);
    assert!(web.dependencies.contains(&"configmap-shop-web-config".to_string()));
    assert!(web.dependencies.contains(&"secret-shop-web-tls".to_string()));
    assert!(web.dependencies.contains(&"serviceaccount-shop-web-sa".to_string()));

    let service = find(&nodes, "deployment-shop-web-service");
    let ingress = find(&nodes, "deployment-shop-web-ingress");
    let external = find(&nodes, "deployment-shop-web-external");
    let pod = find(&nodes, "deployment-shop-web-pod");

    assert_eq!(service.position.y, web.position.y);
    assert!(pod.position.x < web.position.x);
    assert!(web.position.x < service.position.x);
    assert!(service.position.x < ingress.position.x);
    assert!(ingress.position.x < external.position.x);
}

#[test]
fn test_external_edge_is_dashed() {
    let graph = build_graph(&shop_project(), GraphFilter::All, None);

    let dashed: Vec<_> = graph.edges.iter().filter(|e| e.dashed).collect();
    assert_eq!(dashed.len(), 1);
    assert_eq!(dashed[0].to, "deployment-shop-web-external");
    assert_eq!(dashed[0].from, "deployment-shop-web-ingress");
}

#[test]
fn test_daemonset_without_service() {
    let nodes = build_resource_graph(&shop_project(), GraphFilter::All, None);

    let shipper = find(&nodes, "daemonset-shop-log-shipper");
    assert!(shipper.metadata.get("replicas").is_none());
    assert!(!ids(&nodes).contains("daemonset-shop-log-shipper-service"));
    assert!(ids(&nodes).contains("daemonset-shop-log-shipper-pod"));
}

#[test]
fn test_blank_image_marks_workload_out_of_sync() {
    let graph = build_graph(&single_deployment(""), GraphFilter::All, None);
    let json = serde_json::to_value(&graph).unwrap();

    let web = json["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["id"] == "deployment-default-web")
        .unwrap();
    assert_eq!(web["type"], "deployment");
    assert_eq!(web["status"], "error");
    assert_eq!(web["syncStatus"], "outofsync");
}

#[test]
fn test_namespace_group_and_cluster_scope() {
    let nodes = build_resource_graph(&shop_project(), GraphFilter::All, None);

    let namespace = find(&nodes, "namespace-shop");
    assert!(namespace.children.contains(&"deployment-shop-web".to_string()));
    assert!(namespace.children.contains(&"cronjob-shop-nightly-report".to_string()));

    let cluster_role = find(&nodes, "clusterrole-node-viewer");
    assert_eq!(cluster_role.namespace, "cluster-wide");
    assert!(cluster_role.position.y > namespace.position.y);

    // The declared but empty `default` namespace is not drawn
    assert!(!ids(&nodes).contains("namespace-default"));
}

#[test]
fn test_namespace_filter_hides_cluster_scope() {
    let nodes = build_resource_graph(&shop_project(), GraphFilter::All, Some(" shop "));

    assert!(!nodes.is_empty());
    assert!(!ids(&nodes).contains("clusterrole-node-viewer"));
    assert!(nodes.iter().all(|n| n.namespace == "shop"));

    let none = build_resource_graph(&shop_project(), GraphFilter::All, Some("staging"));
    assert!(none.is_empty());
}

#[test]
fn test_single_kind_filters() {
    let project = shop_project();
    let count = |filter| build_resource_graph(&project, filter, None).len();

    assert_eq!(count(GraphFilter::Deployments), 1);
    assert_eq!(count(GraphFilter::Daemonsets), 1);
    assert_eq!(count(GraphFilter::Configmaps), 1);
    assert_eq!(count(GraphFilter::Secrets), 2);
    assert_eq!(count(GraphFilter::Serviceaccounts), 1);
    assert_eq!(count(GraphFilter::Roles), 2);
    assert_eq!(count(GraphFilter::Rolebindings), 1);
    assert_eq!(count(GraphFilter::Jobs), 1);
    assert_eq!(count(GraphFilter::Namespaces), 2);

    let deployments = build_resource_graph(&project, GraphFilter::Deployments, None);
    assert_eq!(deployments[0].kind, NodeKind::Deployment);
}

#[test]
fn test_positions_are_normalized() {
    let nodes = build_resource_graph(&shop_project(), GraphFilter::All, None);

    let min_x = nodes.iter().map(|n| n.position.x).fold(f64::INFINITY, f64::min);
    let min_y = nodes.iter().map(|n| n.position.y).fold(f64::INFINITY, f64::min);
    assert_eq!(min_x, CANVAS_PADDING);
    assert_eq!(min_y, CANVAS_PADDING);
}

#[test]
fn test_graph_is_deterministic() {
    let project = shop_project();
    let first = build_resource_graph(&project, GraphFilter::All, None);
    let second = build_resource_graph(&project, GraphFilter::All, None);

    assert_eq!(first, second);
    assert_eq!(graph_edges(&first), graph_edges(&second));
}

#[test]
fn test_node_preview_renders_owner() {
    let project = shop_project();
    let nodes = build_resource_graph(&project, GraphFilter::All, None);

    let ingress = find(&nodes, "deployment-shop-web-ingress");
    let yaml = render_node_yaml(&project, ingress, None).unwrap();
    assert!(yaml.contains("kind: Deployment"));
    assert!(yaml.contains("kind: Ingress"));

    let cluster_role = find(&nodes, "clusterrole-node-viewer");
    let yaml = render_node_yaml(&project, cluster_role, None).unwrap();
    assert!(yaml.contains("kind: ClusterRole"));
    assert!(!yaml.contains("namespace:"));
}
