use std::fmt;
use std::mem;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::union_find::DisjointSet;
use crate::ClusterError;

/// Ordered, non-empty list of document ids judged to be clones of each other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cluster {
    members: Vec<String>,
}

impl Cluster {
    pub fn singleton(id: impl Into<String>) -> Self {
        Self {
            members: vec![id.into()],
        }
    }

    /// `None` for an empty member list.
    pub fn from_members(members: Vec<String>) -> Option<Self> {
        if members.is_empty() {
            None
        } else {
            Some(Self { members })
        }
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn into_members(self) -> Vec<String> {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|member| member == id)
    }

    fn push(&mut self, id: String) {
        self.members.push(id);
    }

    /// Drop repeated ids, keeping first occurrences in order.
    fn dedup_in_order(&mut self) {
        let mut seen: HashSet<String> = HashSet::with_capacity(self.members.len());
        self.members.retain(|id| seen.insert(id.clone()));
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClusterConfig {
    /// Also record a document in every other cluster holding one of its
    /// matches, so that merging connects those clusters.
    pub link_bridges: bool,
}

impl ClusterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link_bridges(mut self, enabled: bool) -> Self {
        self.link_bridges = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), ClusterError> {
        Ok(())
    }
}

/// Lifecycle of a [`ClusterBuilder`]. Phases only move forward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Assigning,
    Merged,
    Deduped,
    Frozen,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Assigning => "assigning",
            Phase::Merged => "merged",
            Phase::Deduped => "deduped",
            Phase::Frozen => "frozen",
        };
        f.write_str(name)
    }
}

/// Result of assigning one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// No matched candidate was clustered yet; a new cluster was opened.
    Created { cluster: usize },
    /// The document joined the earliest cluster holding one of its matches.
    /// `linked` lists the further clusters it was recorded in when bridging
    /// is enabled.
    Joined { cluster: usize, linked: Vec<usize> },
}

impl Assignment {
    pub fn cluster(&self) -> usize {
        match self {
            Assignment::Created { cluster } | Assignment::Joined { cluster, .. } => *cluster,
        }
    }
}

/// Builds clone clusters from per-document match lists.
///
/// Documents are assigned one at a time in input order; the builder then
/// merges overlapping clusters, removes repeated ids and freezes.
#[derive(Debug, Clone)]
pub struct ClusterBuilder {
    config: ClusterConfig,
    phase: Phase,
    clusters: Vec<Cluster>,
    /// Cluster indices holding each assigned id, ascending.
    membership: HashMap<String, Vec<usize>>,
}

impl ClusterBuilder {
    pub fn new(config: ClusterConfig) -> Self {
        Self {
            config,
            phase: Phase::Assigning,
            clusters: Vec::new(),
            membership: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn is_assigned(&self, id: &str) -> bool {
        self.membership.contains_key(id)
    }

    /// Assign `doc_id` given the ids it matched.
    ///
    /// The document joins the first cluster, in creation order, containing
    /// any of `matched`; matched ids not yet assigned are ignored. With no
    /// such cluster a new one is created.
    pub fn assign<S>(&mut self, doc_id: impl Into<String>, matched: &[S]) -> Result<Assignment, ClusterError>
    where
        S: AsRef<str>,
    {
        if self.phase != Phase::Assigning {
            return Err(ClusterError::Phase {
                operation: "assign",
                phase: self.phase,
            });
        }
        let doc_id: String = doc_id.into();
        if self.membership.contains_key(&doc_id) {
            return Err(ClusterError::AlreadyAssigned(doc_id));
        }

        let mut hits: Vec<usize> = matched
            .iter()
            .filter_map(|id| self.membership.get(id.as_ref()))
            .flatten()
            .copied()
            .collect();
        hits.sort_unstable();
        hits.dedup();

        let Some((&first, rest)) = hits.split_first() else {
            let cluster = self.clusters.len();
            self.clusters.push(Cluster::singleton(doc_id.clone()));
            self.membership.insert(doc_id, vec![cluster]);
            return Ok(Assignment::Created { cluster });
        };

        let linked: Vec<usize> = if self.config.link_bridges {
            rest.to_vec()
        } else {
            Vec::new()
        };

        self.clusters[first].push(doc_id.clone());
        for &other in &linked {
            self.clusters[other].push(doc_id.clone());
        }
        let mut holders = Vec::with_capacity(linked.len() + 1);
        holders.push(first);
        holders.extend_from_slice(&linked);
        self.membership.insert(doc_id, holders);

        Ok(Assignment::Joined {
            cluster: first,
            linked,
        })
    }

    /// Merge clusters that share a document id, to a fixed point.
    /// Running it again is a no-op.
    pub fn merge(&mut self) -> Result<(), ClusterError> {
        match self.phase {
            Phase::Assigning | Phase::Merged => {
                self.merge_pass();
                self.phase = Phase::Merged;
                Ok(())
            }
            phase => Err(ClusterError::Phase {
                operation: "merge",
                phase,
            }),
        }
    }

    /// Remove repeated ids inside each cluster, preserving first-seen order.
    pub fn dedup(&mut self) -> Result<(), ClusterError> {
        match self.phase {
            Phase::Merged | Phase::Deduped => {
                self.dedup_pass();
                self.phase = Phase::Deduped;
                Ok(())
            }
            phase => Err(ClusterError::Phase {
                operation: "dedup",
                phase,
            }),
        }
    }

    /// Run any pass not yet run and freeze. Later calls return the same clusters.
    pub fn finish(&mut self) -> &[Cluster] {
        if self.phase == Phase::Assigning {
            self.merge_pass();
            self.phase = Phase::Merged;
        }
        if self.phase == Phase::Merged {
            self.dedup_pass();
        }
        self.phase = Phase::Frozen;
        &self.clusters
    }

    /// Finish and take the frozen clusters.
    pub fn into_clusters(mut self) -> Vec<Cluster> {
        self.finish();
        self.clusters
    }

    fn merge_pass(&mut self) {
        self.clusters = merge_overlapping(mem::take(&mut self.clusters));
        self.rebuild_membership();
    }

    fn dedup_pass(&mut self) {
        for cluster in &mut self.clusters {
            cluster.dedup_in_order();
        }
        self.clusters.retain(|cluster| !cluster.is_empty());
        self.rebuild_membership();
    }

    fn rebuild_membership(&mut self) {
        self.membership.clear();
        for (index, cluster) in self.clusters.iter().enumerate() {
            for id in cluster.members() {
                let holders = self.membership.entry(id.clone()).or_default();
                if holders.last() != Some(&index) {
                    holders.push(index);
                }
            }
        }
    }
}

/// Merge clusters sharing any id, transitively.
///
/// A merged cluster takes the position of its earliest input cluster and
/// concatenates the members of its inputs in input order; repeated ids are
/// kept. After one call no two clusters share an id, so a second call
/// returns its input unchanged.
pub fn merge_overlapping(clusters: Vec<Cluster>) -> Vec<Cluster> {
    let groups = {
        let mut set = DisjointSet::new(clusters.len());
        let mut first_holder: HashMap<&str, usize> = HashMap::new();
        for (index, cluster) in clusters.iter().enumerate() {
            for id in cluster.members() {
                match first_holder.get(id.as_str()) {
                    Some(&holder) => {
                        set.union(holder, index);
                    }
                    None => {
                        first_holder.insert(id.as_str(), index);
                    }
                }
            }
        }
        set.groups()
    };
    if groups.len() == clusters.len() {
        return clusters;
    }

    let mut slots: Vec<Option<Cluster>> = clusters.into_iter().map(Some).collect();
    groups
        .into_iter()
        .filter_map(|group| {
            let members: Vec<String> = group
                .into_iter()
                .filter_map(|index| slots[index].take())
                .flat_map(Cluster::into_members)
                .collect();
            Cluster::from_members(members)
        })
        .collect()
}
