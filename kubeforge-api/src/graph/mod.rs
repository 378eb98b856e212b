//! Resource graph builder
//!
//! Projects a [`ProjectState`] into positioned [`FlowNode`]s for the visual
//! preview. The builder is a pure function of its inputs: the same project,
//! filter and namespace always yield the same ids, positions and statuses.
//!
//! Layout in the unfiltered view goes namespace by namespace, top to bottom.
//! Each group holds one row per workload followed by grids for
//! ServiceAccounts, Roles, RoleBindings, Jobs and leftover ConfigMaps/Secrets.
//! The namespace node closes the group. Cluster-scoped RBAC comes last. Any
//! other filter lays the selected kind out in a plain grid.

mod layout;
mod nodes;
mod preview;
mod status;

pub use layout::{normalize, CANVAS_PADDING};
pub use nodes::{node_id, CLUSTER_WIDE};
pub use preview::render_node_yaml;
pub use status::{Validate, Validity};

use crate::kubernetes::labels::namespace_or_default;
use indexmap::IndexMap;
use kubeforge_common::{
    is_blank, ClusterRole, ConfigMap, DockerHubSecret, FlowNode, GraphEdge, GraphFilter,
    GraphResponse, Job, Namespace, NodeKind, Position, ProjectState, Role, RoleBinding, Secret,
    ServiceAccount, WorkloadConfig, WorkloadKind,
};
use layout::{
    grid_positions, uniform_grid, ANCHOR_X, ATTACHED_SPACING, CELL_HEIGHT, COLUMN_SPACING,
    GROUP_COLUMNS, GROUP_GAP, POD_OFFSET_Y, ROW_HEIGHT, STANDALONE_COLUMNS, UPSTREAM_SPACING,
};
use std::collections::HashSet;

/// Build the positioned node list for `filter`, optionally restricted to one namespace
pub fn build_resource_graph(
    project: &ProjectState,
    filter: GraphFilter,
    namespace_filter: Option<&str>,
) -> Vec<FlowNode> {
    let namespace_filter = namespace_filter.map(str::trim).filter(|ns| !ns.is_empty());
    let scope = Scope::new(project, filter, namespace_filter);

    let mut nodes = match filter {
        GraphFilter::All => {
            let mut builder = GraphBuilder::default();
            for group in group_by_namespace(&scope).into_values() {
                if !group.is_empty() {
                    builder.place_group(&group);
                }
            }
            builder.place_cluster_scope(&scope);
            builder.nodes
        }
        _ => standalone_layout(project, &scope, filter),
    };

    prune_references(&mut nodes);
    normalize(&mut nodes);
    nodes
}

/// One edge per (dependency, node) pair, dashed when it ends at external traffic
pub fn graph_edges(nodes: &[FlowNode]) -> Vec<GraphEdge> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    for node in nodes {
        for dependency in &node.dependencies {
            if seen.insert((dependency.as_str(), node.id.as_str())) {
                edges.push(GraphEdge {
                    from: dependency.clone(),
                    to: node.id.clone(),
                    dashed: node.kind == NodeKind::External,
                });
            }
        }
    }

    edges
}

/// Nodes and edges in one response
pub fn build_graph(project: &ProjectState, filter: GraphFilter, namespace_filter: Option<&str>) -> GraphResponse {
    let nodes = build_resource_graph(project, filter, namespace_filter);
    let edges = graph_edges(&nodes);
    GraphResponse { nodes, edges }
}

/// Drop dependency and child ids that name no node, along with self-references and repeats
fn prune_references(nodes: &mut [FlowNode]) {
    let ids: HashSet<String> = nodes.iter().map(|n| n.id.clone()).collect();

    for node in nodes.iter_mut() {
        let own = node.id.clone();
        let mut seen = HashSet::new();
        node.dependencies
            .retain(|id| *id != own && ids.contains(id) && seen.insert(id.clone()));
        node.children.retain(|id| ids.contains(id));
    }
}

// ============================================================================
// Scope: the collections visible under a filter
// ============================================================================

fn select<'a, T>(include: bool, items: &'a [T], keep: impl Fn(&T) -> bool) -> Vec<&'a T> {
    if !include {
        return Vec::new();
    }
    items.iter().filter(|item| keep(*item)).collect()
}

fn binding_namespace(binding: &RoleBinding) -> &str {
    binding.effective_namespace().unwrap_or("default")
}

struct Scope<'a> {
    deployments: Vec<&'a WorkloadConfig>,
    daemonsets: Vec<&'a WorkloadConfig>,
    namespaces: Vec<&'a Namespace>,
    config_maps: Vec<&'a ConfigMap>,
    secrets: Vec<&'a Secret>,
    docker_hub_secrets: Vec<&'a DockerHubSecret>,
    service_accounts: Vec<&'a ServiceAccount>,
    roles: Vec<&'a Role>,
    cluster_roles: Vec<&'a ClusterRole>,
    role_bindings: Vec<&'a RoleBinding>,
    cluster_role_bindings: Vec<&'a RoleBinding>,
    jobs: Vec<&'a Job>,
}

impl<'a> Scope<'a> {
    /// Cluster-scoped kinds disappear under a namespace restriction
    fn new(project: &'a ProjectState, filter: GraphFilter, namespace: Option<&str>) -> Self {
        use GraphFilter as F;

        let wants = |kind: GraphFilter| filter == F::All || filter == kind;
        let in_namespace = |ns: &str| namespace.map_or(true, |wanted| namespace_or_default(ns) == wanted);
        let cluster_visible = namespace.is_none();

        Self {
            deployments: select(wants(F::Deployments), &project.deployments, |d| in_namespace(&d.namespace)),
            daemonsets: select(wants(F::Daemonsets), &project.daemonsets, |d| in_namespace(&d.namespace)),
            namespaces: select(wants(F::Namespaces), &project.namespaces, |n| {
                !is_blank(&n.name) && namespace.map_or(true, |wanted| n.name == wanted)
            }),
            config_maps: select(wants(F::Configmaps), &project.config_maps, |c| in_namespace(&c.namespace)),
            secrets: select(wants(F::Secrets), &project.secrets, |s| in_namespace(&s.namespace)),
            docker_hub_secrets: select(wants(F::Secrets), &project.docker_hub_secrets, |s| {
                in_namespace(&s.namespace)
            }),
            service_accounts: select(wants(F::Serviceaccounts), &project.service_accounts, |a| {
                in_namespace(&a.namespace)
            }),
            roles: select(wants(F::Roles), &project.roles, |r| in_namespace(&r.namespace)),
            cluster_roles: select(wants(F::Roles) && cluster_visible, &project.cluster_roles, |_| true),
            role_bindings: select(wants(F::Rolebindings), &project.role_bindings, |b| {
                !b.is_cluster_role_binding && in_namespace(binding_namespace(b))
            }),
            cluster_role_bindings: select(
                wants(F::Rolebindings) && cluster_visible,
                &project.role_bindings,
                |b| b.is_cluster_role_binding,
            ),
            jobs: select(wants(F::Jobs), &project.jobs, |j| in_namespace(&j.namespace)),
        }
    }
}

// ============================================================================
// Namespace grouping
// ============================================================================

struct NamespaceGroup<'a> {
    name: String,
    /// `None` when the namespace is only implied by the resources in it
    declared: Option<&'a Namespace>,
    deployments: Vec<&'a WorkloadConfig>,
    daemonsets: Vec<&'a WorkloadConfig>,
    config_maps: Vec<&'a ConfigMap>,
    secrets: Vec<&'a Secret>,
    docker_hub_secrets: Vec<&'a DockerHubSecret>,
    service_accounts: Vec<&'a ServiceAccount>,
    roles: Vec<&'a Role>,
    role_bindings: Vec<&'a RoleBinding>,
    jobs: Vec<&'a Job>,
}

impl<'a> NamespaceGroup<'a> {
    fn new(name: String) -> Self {
        Self {
            name,
            declared: None,
            deployments: Vec::new(),
            daemonsets: Vec::new(),
            config_maps: Vec::new(),
            secrets: Vec::new(),
            docker_hub_secrets: Vec::new(),
            service_accounts: Vec::new(),
            roles: Vec::new(),
            role_bindings: Vec::new(),
            jobs: Vec::new(),
        }
    }

    fn resource_count(&self) -> usize {
        self.deployments.len()
            + self.daemonsets.len()
            + self.config_maps.len()
            + self.secrets.len()
            + self.docker_hub_secrets.len()
            + self.service_accounts.len()
            + self.roles.len()
            + self.role_bindings.len()
            + self.jobs.len()
    }

    fn is_empty(&self) -> bool {
        self.resource_count() == 0
    }

    fn config_map_node(&self, name: &str) -> Option<FlowNode> {
        self.config_maps
            .iter()
            .find(|c| c.name == name)
            .map(|c| nodes::config_map_node(c))
    }

    /// Plain Secrets first, then DockerHub credentials of the same name
    fn secret_node(&self, name: &str) -> Option<FlowNode> {
        if let Some(secret) = self.secrets.iter().find(|s| s.name == name) {
            return Some(nodes::secret_node(secret));
        }
        self.docker_hub_secrets
            .iter()
            .find(|s| s.name == name)
            .map(|s| nodes::docker_hub_secret_node(s))
    }

    fn namespace(&self) -> Namespace {
        self.declared
            .cloned()
            .unwrap_or_else(|| Namespace::new(self.name.clone()))
    }
}

/// Declared namespaces first in project order, then implied ones as first seen
fn group_by_namespace<'a>(scope: &Scope<'a>) -> IndexMap<String, NamespaceGroup<'a>> {
    let mut groups: IndexMap<String, NamespaceGroup<'a>> = IndexMap::new();

    for &namespace in &scope.namespaces {
        groups
            .entry(namespace.name.clone())
            .or_insert_with(|| NamespaceGroup::new(namespace.name.clone()))
            .declared
            .get_or_insert(namespace);
    }

    fn group<'g, 'a>(
        groups: &'g mut IndexMap<String, NamespaceGroup<'a>>,
        namespace: &str,
    ) -> &'g mut NamespaceGroup<'a> {
        let key = namespace_or_default(namespace).to_string();
        groups
            .entry(key.clone())
            .or_insert_with(|| NamespaceGroup::new(key))
    }

    for &config in &scope.deployments {
        group(&mut groups, &config.namespace).deployments.push(config);
    }
    for &config in &scope.daemonsets {
        group(&mut groups, &config.namespace).daemonsets.push(config);
    }
    for &config_map in &scope.config_maps {
        group(&mut groups, &config_map.namespace).config_maps.push(config_map);
    }
    for &secret in &scope.secrets {
        group(&mut groups, &secret.namespace).secrets.push(secret);
    }
    for &secret in &scope.docker_hub_secrets {
        group(&mut groups, &secret.namespace).docker_hub_secrets.push(secret);
    }
    for &account in &scope.service_accounts {
        group(&mut groups, &account.namespace).service_accounts.push(account);
    }
    for &role in &scope.roles {
        group(&mut groups, &role.namespace).roles.push(role);
    }
    for &binding in &scope.role_bindings {
        group(&mut groups, binding_namespace(binding)).role_bindings.push(binding);
    }
    for &job in &scope.jobs {
        group(&mut groups, &job.namespace).jobs.push(job);
    }

    groups
}

// ============================================================================
// Grouped layout
// ============================================================================

#[derive(Default)]
struct GraphBuilder {
    nodes: Vec<FlowNode>,
    /// ConfigMap/Secret node ids already drawn next to a workload
    placed: HashSet<String>,
    current_y: f64,
}

impl GraphBuilder {
    fn place_group(&mut self, group: &NamespaceGroup<'_>) {
        let first = self.nodes.len();

        for config in &group.deployments {
            self.place_workload(config, WorkloadKind::Deployment, group);
        }
        for config in &group.daemonsets {
            self.place_workload(config, WorkloadKind::DaemonSet, group);
        }

        self.place_service_accounts(group);
        self.place_grid(group.roles.iter().map(|r| nodes::role_node(r)).collect());
        self.place_grid(group.role_bindings.iter().map(|b| nodes::role_binding_node(b)).collect());
        self.place_grid(group.jobs.iter().map(|j| nodes::job_node(j)).collect());

        let leftovers: Vec<FlowNode> = group
            .config_maps
            .iter()
            .map(|c| nodes::config_map_node(c))
            .chain(group.secrets.iter().map(|s| nodes::secret_node(s)))
            .chain(group.docker_hub_secrets.iter().map(|s| nodes::docker_hub_secret_node(s)))
            .filter(|n| !self.placed.contains(&n.id))
            .collect();
        self.place_grid(leftovers);

        let mut namespace = nodes::namespace_node(
            &group.namespace(),
            group.resource_count(),
            group.declared.is_some(),
        );
        namespace.position = Position::new(ANCHOR_X, self.current_y);
        namespace.children = self.nodes[first..].iter().map(|n| n.id.clone()).collect();
        self.nodes.push(namespace);
        self.current_y += CELL_HEIGHT + GROUP_GAP;
    }

    /// One row: upstream ConfigMaps/Secrets, Pod, workload, Service, Ingress, External
    fn place_workload(&mut self, config: &WorkloadConfig, kind: WorkloadKind, group: &NamespaceGroup<'_>) {
        let top = self.current_y;
        let mut workload = nodes::workload_node(config, kind);
        workload.position = Position::new(ANCHOR_X, top);

        let upstream = config
            .referenced_config_maps()
            .into_iter()
            .filter_map(|name| group.config_map_node(&name))
            .chain(
                config
                    .referenced_secrets()
                    .into_iter()
                    .filter_map(|name| group.secret_node(&name)),
            );

        let mut stacked = 0usize;
        for mut node in upstream {
            workload.dependencies.push(node.id.clone());
            if self.placed.insert(node.id.clone()) {
                node.position = Position::new(
                    ANCHOR_X - 2.0 * COLUMN_SPACING,
                    top + stacked as f64 * UPSTREAM_SPACING,
                );
                stacked += 1;
                self.nodes.push(node);
            }
        }

        let mut pod = nodes::pod_node(config, kind, &workload);
        pod.position = Position::new(ANCHOR_X - COLUMN_SPACING, top + POD_OFFSET_Y);
        workload.children.push(pod.id.clone());

        let mut downstream = Vec::new();
        if kind == WorkloadKind::Deployment || config.service_enabled {
            let mut service = nodes::service_node(config, &workload);
            service.position = Position::new(ANCHOR_X + COLUMN_SPACING, top);
            workload.children.push(service.id.clone());

            if kind == WorkloadKind::Deployment && config.ingress.is_active() {
                let mut ingress = nodes::ingress_node(config, &workload, &service);
                ingress.position = Position::new(ANCHOR_X + 2.0 * COLUMN_SPACING, top);
                let mut external = nodes::external_node(&workload, &ingress);
                external.position = Position::new(ANCHOR_X + 3.0 * COLUMN_SPACING, top);
                workload.children.push(ingress.id.clone());
                workload.children.push(external.id.clone());
                downstream.extend([service, ingress, external]);
            } else {
                downstream.push(service);
            }
        }

        self.nodes.push(workload);
        self.nodes.push(pod);
        self.nodes.extend(downstream);
        self.current_y += ROW_HEIGHT.max(stacked as f64 * UPSTREAM_SPACING);
    }

    /// Two-column grid; each cell grows to fit the secrets drawn under it
    fn place_service_accounts(&mut self, group: &NamespaceGroup<'_>) {
        let expanded: Vec<(FlowNode, Vec<FlowNode>)> = group
            .service_accounts
            .iter()
            .map(|account| {
                let mut node = nodes::service_account_node(account);
                let attached: Vec<FlowNode> = account
                    .secrets
                    .iter()
                    .map(|name| (name, false))
                    .chain(account.image_pull_secrets.iter().map(|name| (name, true)))
                    .filter(|(name, _)| !is_blank(name))
                    .map(|(name, image_pull)| {
                        let resolved = group.secret_node(name).and_then(|n| n.source);
                        nodes::attached_secret_node(&node, name, image_pull, resolved)
                    })
                    .collect();
                node.dependencies.extend(attached.iter().map(|n| n.id.clone()));
                node.children.extend(attached.iter().map(|n| n.id.clone()));
                (node, attached)
            })
            .collect();

        let heights: Vec<f64> = expanded
            .iter()
            .map(|(_, attached)| CELL_HEIGHT + attached.len() as f64 * ATTACHED_SPACING)
            .collect();
        let (positions, height) = grid_positions(
            Position::new(ANCHOR_X, self.current_y),
            GROUP_COLUMNS,
            &heights,
        );

        for ((mut account, attached), position) in expanded.into_iter().zip(positions) {
            account.position = position;
            self.nodes.push(account);
            for (index, mut node) in attached.into_iter().enumerate() {
                node.position = Position::new(
                    position.x,
                    position.y + (index + 1) as f64 * ATTACHED_SPACING,
                );
                self.nodes.push(node);
            }
        }
        self.current_y += height;
    }

    fn place_grid(&mut self, grid: Vec<FlowNode>) {
        let (positions, height) = uniform_grid(
            Position::new(ANCHOR_X, self.current_y),
            GROUP_COLUMNS,
            grid.len(),
        );
        for (mut node, position) in grid.into_iter().zip(positions) {
            node.position = position;
            self.nodes.push(node);
        }
        self.current_y += height;
    }

    /// ClusterRoles, then ClusterRoleBindings, below every namespace group
    fn place_cluster_scope(&mut self, scope: &Scope<'_>) {
        self.place_grid(scope.cluster_roles.iter().map(|r| nodes::cluster_role_node(r)).collect());
        self.place_grid(
            scope
                .cluster_role_bindings
                .iter()
                .map(|b| nodes::role_binding_node(b))
                .collect(),
        );
    }
}

// ============================================================================
// Single-kind layout
// ============================================================================

fn standalone_layout(project: &ProjectState, scope: &Scope<'_>, filter: GraphFilter) -> Vec<FlowNode> {
    let mut nodes: Vec<FlowNode> = match filter {
        GraphFilter::All => Vec::new(),
        GraphFilter::Deployments => scope
            .deployments
            .iter()
            .map(|d| nodes::workload_node(d, WorkloadKind::Deployment))
            .collect(),
        GraphFilter::Daemonsets => scope
            .daemonsets
            .iter()
            .map(|d| nodes::workload_node(d, WorkloadKind::DaemonSet))
            .collect(),
        GraphFilter::Namespaces => scope
            .namespaces
            .iter()
            .map(|ns| {
                let resources = Scope::new(project, GraphFilter::All, Some(&ns.name));
                let count = group_by_namespace(&resources)
                    .get(&ns.name)
                    .map_or(0, NamespaceGroup::resource_count);
                nodes::namespace_node(ns, count, true)
            })
            .collect(),
        GraphFilter::Configmaps => scope.config_maps.iter().map(|c| nodes::config_map_node(c)).collect(),
        GraphFilter::Secrets => scope
            .secrets
            .iter()
            .map(|s| nodes::secret_node(s))
            .chain(scope.docker_hub_secrets.iter().map(|s| nodes::docker_hub_secret_node(s)))
            .collect(),
        GraphFilter::Serviceaccounts => scope
            .service_accounts
            .iter()
            .map(|a| nodes::service_account_node(a))
            .collect(),
        GraphFilter::Roles => scope
            .roles
            .iter()
            .map(|r| nodes::role_node(r))
            .chain(scope.cluster_roles.iter().map(|r| nodes::cluster_role_node(r)))
            .collect(),
        GraphFilter::Rolebindings => scope
            .role_bindings
            .iter()
            .chain(scope.cluster_role_bindings.iter())
            .map(|b| nodes::role_binding_node(b))
            .collect(),
        GraphFilter::Jobs => scope.jobs.iter().map(|j| nodes::job_node(j)).collect(),
    };

    let (positions, _) = uniform_grid(Position::new(ANCHOR_X, 0.0), STANDALONE_COLUMNS, nodes.len());
    for (node, position) in nodes.iter_mut().zip(positions) {
        node.position = position;
    }
    nodes
}
