//! Intra-process delivery endpoints.
//!
//! `IntraProcessSubscription` owns a core `IntraProcessBuffer` and signals its
//! guard condition on insertion; `IntraProcessTopic` fans a published message
//! out to every live subscription in the form each one prefers.

mod subscription;
mod topic;

pub use subscription::IntraProcessSubscription;
pub use topic::IntraProcessTopic;
