// Copyright 2024-2025 Contributors to Edugrant
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The composed scholarship read-model.
//!
//! A [`Scholarship`] is assembled from the raw scholarship, application, and
//! vote rows; the store never carries the derived fields. Vote tallies,
//! voter and applicant lists, and the resolved recipient are recomputed on
//! every build so the raw rows remain the single source of truth.

pub mod store;

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use crate::roles::DEFAULT_GOVERNMENT_ADDRESS;
use store::{ApplicationRecord, ApplicationStatus, ScholarshipRecord, ScholarshipStatus, VoteRecord};

const SEED_RECIPIENT_ADDRESS: &str = "0x388175a170a0d8fcb99ff8867c00860fcf95a7cc";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    #[serde(rename = "for")]
    pub votes_for: usize,
    #[serde(rename = "against")]
    pub votes_against: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scholarship {
    pub id: String,
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub creator_address: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    pub status: ScholarshipStatus,
    pub votes: VoteTally,
    pub created_at: u64,
    pub deadline: u64,
    pub voters: Vec<String>,
    pub applicants: Vec<String>,
}

impl Scholarship {
    /// Composes the view for one scholarship from its raw rows.
    ///
    /// The recipient is the applicant of the approved application; if the
    /// data holds more than one approved row the first match wins rather
    /// than failing the build.
    pub fn build(
        record: ScholarshipRecord,
        applications: Vec<ApplicationRecord>,
        votes: Vec<VoteRecord>,
    ) -> Self {
        let applicants = applications
            .iter()
            .map(|application| application.applicant_address.to_string())
            .collect();
        let voters = votes.iter().map(|vote| vote.voter_address.to_string()).collect();

        let votes_for = votes.iter().filter(|vote| vote.vote_type).count();
        let votes_against = votes.iter().filter(|vote| !vote.vote_type).count();

        let recipient = applications
            .iter()
            .find(|application| application.status == ApplicationStatus::Approved)
            .map(|application| application.applicant_address.to_string());

        Scholarship {
            id: record.id,
            title: record.title,
            description: record.description,
            amount: record.amount,
            creator_address: record.creator_address,
            recipient,
            status: record.status,
            votes: VoteTally {
                votes_for,
                votes_against,
            },
            created_at: to_epoch_secs(record.created_at),
            deadline: to_epoch_secs(record.deadline),
            voters,
            applicants,
        }
    }

    /// Whether the proposal still accepts votes and applications: pending
    /// and not past its deadline. Pending proposals past the deadline stay
    /// addressable but drop out of the active views.
    pub fn is_active(&self, now: SystemTime) -> bool {
        self.status == ScholarshipStatus::Pending && self.deadline > to_epoch_secs(now)
    }
}

fn to_epoch_secs(time: SystemTime) -> u64 {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::new(0, 0))
        .as_secs()
}

/// Builds the composed view for every scholarship row.
///
/// Applications and votes are grouped by scholarship id first, so the build
/// is linear in the row counts. Rows referencing unknown scholarships are
/// dropped.
pub fn build_scholarships(
    scholarships: Vec<ScholarshipRecord>,
    applications: Vec<ApplicationRecord>,
    votes: Vec<VoteRecord>,
) -> Vec<Scholarship> {
    let mut applications_by_scholarship: HashMap<String, Vec<ApplicationRecord>> = applications
        .into_iter()
        .fold(HashMap::new(), |mut acc, application| {
            acc.entry(application.scholarship_id.to_string())
                .or_insert_with(Vec::new)
                .push(application);
            acc
        });
    let mut votes_by_scholarship: HashMap<String, Vec<VoteRecord>> =
        votes.into_iter().fold(HashMap::new(), |mut acc, vote| {
            acc.entry(vote.scholarship_id.to_string())
                .or_insert_with(Vec::new)
                .push(vote);
            acc
        });

    scholarships
        .into_iter()
        .map(|record| {
            let applications = applications_by_scholarship
                .remove(&record.id)
                .unwrap_or_else(Vec::new);
            let votes = votes_by_scholarship.remove(&record.id).unwrap_or_else(Vec::new);
            Scholarship::build(record, applications, votes)
        })
        .collect()
}

/// The fixed demo set served when the persistence collaborator is
/// unreachable. Degraded mode for demos, not an error path.
pub fn seed_scholarships(now: SystemTime) -> Vec<Scholarship> {
    const DAY: u64 = 24 * 60 * 60;
    let now_secs = to_epoch_secs(now);

    vec![
        Scholarship {
            id: "seed-1".to_string(),
            title: "Computer Science Scholarship".to_string(),
            description: "For students pursuing a degree in computer science".to_string(),
            amount: 0.5,
            creator_address: DEFAULT_GOVERNMENT_ADDRESS.to_string(),
            recipient: None,
            status: ScholarshipStatus::Pending,
            votes: VoteTally {
                votes_for: 5,
                votes_against: 1,
            },
            created_at: now_secs - 7 * DAY,
            deadline: now_secs + 30 * DAY,
            voters: vec![],
            applicants: vec![],
        },
        Scholarship {
            id: "seed-2".to_string(),
            title: "Engineering Excellence".to_string(),
            description: "Supporting future engineers in their academic journey".to_string(),
            amount: 0.75,
            creator_address: DEFAULT_GOVERNMENT_ADDRESS.to_string(),
            recipient: Some(SEED_RECIPIENT_ADDRESS.to_string()),
            status: ScholarshipStatus::Approved,
            votes: VoteTally {
                votes_for: 8,
                votes_against: 2,
            },
            created_at: now_secs - 14 * DAY,
            deadline: now_secs + 15 * DAY,
            voters: vec![],
            applicants: vec![SEED_RECIPIENT_ADDRESS.to_string()],
        },
        Scholarship {
            id: "seed-3".to_string(),
            title: "Blockchain Development".to_string(),
            description: "For students interested in blockchain technology".to_string(),
            amount: 1.0,
            creator_address: DEFAULT_GOVERNMENT_ADDRESS.to_string(),
            recipient: Some(SEED_RECIPIENT_ADDRESS.to_string()),
            status: ScholarshipStatus::Completed,
            votes: VoteTally {
                votes_for: 10,
                votes_against: 0,
            },
            created_at: now_secs - 60 * DAY,
            deadline: now_secs - 15 * DAY,
            voters: vec![],
            applicants: vec![SEED_RECIPIENT_ADDRESS.to_string()],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scholarship_record(id: &str) -> ScholarshipRecord {
        ScholarshipRecord {
            id: id.to_string(),
            title: "Computer Science Scholarship".to_string(),
            description: "For students pursuing a degree in computer science".to_string(),
            amount: 0.5,
            creator_address: DEFAULT_GOVERNMENT_ADDRESS.to_string(),
            status: ScholarshipStatus::Pending,
            deadline: SystemTime::now() + Duration::from_secs(30 * 24 * 60 * 60),
            created_at: SystemTime::now(),
        }
    }

    fn application(id: &str, scholarship_id: &str, applicant: &str, status: ApplicationStatus) -> ApplicationRecord {
        ApplicationRecord {
            id: id.to_string(),
            scholarship_id: scholarship_id.to_string(),
            applicant_address: applicant.to_string(),
            status,
            created_at: SystemTime::now(),
        }
    }

    fn vote(id: &str, scholarship_id: &str, voter: &str, vote_type: bool) -> VoteRecord {
        VoteRecord {
            id: id.to_string(),
            scholarship_id: scholarship_id.to_string(),
            voter_address: voter.to_string(),
            vote_type,
            created_at: SystemTime::now(),
        }
    }

    /// A scholarship with no applications or votes builds to empty lists,
    /// a zero tally, and no recipient.
    #[test]
    fn test_build_with_empty_collections() {
        let views = build_scholarships(vec![scholarship_record("s1")], vec![], vec![]);

        assert_eq!(views.len(), 1);
        assert_eq!(
            views[0].votes,
            VoteTally {
                votes_for: 0,
                votes_against: 0,
            }
        );
        assert!(views[0].voters.is_empty());
        assert!(views[0].applicants.is_empty());
        assert_eq!(views[0].recipient, None);
    }

    /// The vote tally partitions votes on vote_type and the voter list holds
    /// every voting address; rows for other scholarships are not counted.
    #[test]
    fn test_build_partitions_votes_by_scholarship() {
        let views = build_scholarships(
            vec![scholarship_record("s1"), scholarship_record("s2")],
            vec![],
            vec![
                vote("v1", "s1", "0xaaa", true),
                vote("v2", "s1", "0xbbb", true),
                vote("v3", "s1", "0xccc", false),
                vote("v4", "s2", "0xaaa", false),
            ],
        );

        let s1 = views.iter().find(|s| s.id == "s1").unwrap();
        assert_eq!(
            s1.votes,
            VoteTally {
                votes_for: 2,
                votes_against: 1,
            }
        );
        assert_eq!(s1.voters.len(), 3);

        let s2 = views.iter().find(|s| s.id == "s2").unwrap();
        assert_eq!(
            s2.votes,
            VoteTally {
                votes_for: 0,
                votes_against: 1,
            }
        );
    }

    /// The recipient is defined iff an approved application exists and is
    /// that application's applicant address.
    #[test]
    fn test_recipient_derivation() {
        let views = build_scholarships(
            vec![scholarship_record("s1")],
            vec![
                application("a1", "s1", "0xaaa", ApplicationStatus::Pending),
                application("a2", "s1", "0xbbb", ApplicationStatus::Approved),
            ],
            vec![],
        );

        assert_eq!(views[0].recipient.as_deref(), Some("0xbbb"));
        assert_eq!(views[0].applicants, vec!["0xaaa", "0xbbb"]);
    }

    /// If the data ever holds two approved applications the builder picks
    /// the first match deterministically instead of failing.
    #[test]
    fn test_recipient_first_match_on_inconsistent_data() {
        let views = build_scholarships(
            vec![scholarship_record("s1")],
            vec![
                application("a1", "s1", "0xaaa", ApplicationStatus::Approved),
                application("a2", "s1", "0xbbb", ApplicationStatus::Approved),
            ],
            vec![],
        );

        assert_eq!(views[0].recipient.as_deref(), Some("0xaaa"));
    }

    /// A pending scholarship past its deadline is no longer active but is
    /// still addressable in the built views.
    #[test]
    fn test_active_excludes_expired_pending() {
        let now = SystemTime::now();
        let mut record = scholarship_record("s1");
        record.deadline = now - Duration::from_secs(60);

        let views = build_scholarships(vec![record], vec![], vec![]);
        assert_eq!(views.len(), 1);
        assert!(!views[0].is_active(now));

        let fresh = build_scholarships(vec![scholarship_record("s2")], vec![], vec![]);
        assert!(fresh[0].is_active(now));
    }

    /// The seed set stays internally consistent: the demo entries carry the
    /// statuses and recipients the dashboards expect.
    #[test]
    fn test_seed_scholarships() {
        let now = SystemTime::now();
        let seeds = seed_scholarships(now);

        assert_eq!(seeds.len(), 3);
        assert_eq!(seeds[0].status, ScholarshipStatus::Pending);
        assert!(seeds[0].is_active(now));
        assert_eq!(seeds[1].status, ScholarshipStatus::Approved);
        assert_eq!(seeds[1].recipient.as_deref(), Some(SEED_RECIPIENT_ADDRESS));
        assert_eq!(seeds[2].status, ScholarshipStatus::Completed);
        assert!(!seeds[2].is_active(now));
    }
}
