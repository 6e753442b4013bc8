//! Sample dataset written by the one-time initialize operation.

use crate::error::Result;
use crate::model::family::{Family, NewFamily};
use crate::model::member::{Member, MemberInput};
use crate::model::relationship::{NewRelationship, Relationship};
use crate::query::KinshipEngine;
use crate::storage::SeedData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded {
        families: usize,
        members: usize,
        relationships: usize,
    },
    AlreadyInitialized,
}

impl SeedOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SeedOutcome::Seeded { .. } => "Sample data initialized successfully",
            SeedOutcome::AlreadyInitialized => "Data already initialized",
        }
    }
}

const FAMILIES: [(&str, &str); 3] = [
    ("गुप्ता परिवार", "Village's oldest family"),
    ("शर्मा परिवार", "Known for their farming expertise"),
    ("वर्मा परिवार", "Skilled craftsmen and artisans"),
];

// (family index, name, age, occupation, gender)
const MEMBERS: [(usize, &str, i32, &str, &str); 10] = [
    (0, "राम गुप्ता", 65, "सरपंच", "पुरुष"),
    (0, "सीता गुप्ता", 60, "गृहिणी", "महिला"),
    (0, "अमित गुप्ता", 35, "शिक्षक", "पुरुष"),
    (0, "प्रिया गुप्ता", 30, "नर्स", "महिला"),
    (1, "कृष्ण शर्मा", 58, "किसान", "पुरुष"),
    (1, "राधा शर्मा", 55, "गृहिणी", "महिला"),
    (1, "विकास शर्मा", 32, "किसान", "पुरुष"),
    (2, "मोहन वर्मा", 62, "बढ़ई", "पुरुष"),
    (2, "गीता वर्मा", 58, "गृहिणी", "महिला"),
    (2, "रोहित वर्मा", 28, "बढ़ई", "पुरुष"),
];

// (member index, member index, relationship type)
const RELATIONSHIPS: [(usize, usize, &str); 10] = [
    (0, 1, "spouse"),
    (0, 2, "father"),
    (1, 2, "mother"),
    (2, 3, "spouse"),
    (4, 5, "spouse"),
    (4, 6, "father"),
    (5, 6, "mother"),
    (7, 8, "spouse"),
    (7, 9, "father"),
    (8, 9, "mother"),
];

/// Build the sample families, members and relationships with fresh ids.
pub fn sample_data() -> SeedData {
    let families: Vec<Family> = FAMILIES
        .iter()
        .map(|(name, description)| {
            Family::create(NewFamily::new(*name).with_description(*description))
        })
        .collect();

    let members: Vec<Member> = MEMBERS
        .iter()
        .map(|&(family, name, age, occupation, gender)| {
            Member::create(MemberInput {
                age: Some(age),
                occupation: Some(occupation.to_string()),
                gender: Some(gender.to_string()),
                ..MemberInput::new(families[family].id, name)
            })
        })
        .collect();

    let relationships = RELATIONSHIPS
        .iter()
        .map(|&(a, b, kind)| {
            Relationship::create(NewRelationship::new(members[a].id, members[b].id, kind))
        })
        .collect();

    SeedData {
        families,
        members,
        relationships,
    }
}

/// Populate the store with [`sample_data`] unless any family already exists.
pub async fn initialize(engine: &KinshipEngine) -> Result<SeedOutcome> {
    let data = sample_data();
    if !engine.storage.seed_if_empty(&data).await? {
        tracing::info!("sample data already present, skipping");
        return Ok(SeedOutcome::AlreadyInitialized);
    }
    let outcome = SeedOutcome::Seeded {
        families: data.families.len(),
        members: data.members.len(),
        relationships: data.relationships.len(),
    };
    tracing::info!(?outcome, "sample data initialized");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_data_shape() {
        let data = sample_data();
        assert_eq!(data.families.len(), 3);
        assert_eq!(data.members.len(), 10);
        assert_eq!(data.relationships.len(), 10);

        let per_family: Vec<usize> = data
            .families
            .iter()
            .map(|f| data.members.iter().filter(|m| m.family_id == f.id).count())
            .collect();
        assert_eq!(per_family, vec![4, 3, 3]);
    }

    #[test]
    fn test_sample_relationships_stay_within_a_family() {
        let data = sample_data();
        for rel in &data.relationships {
            let family_of = |id| {
                data.members
                    .iter()
                    .find(|m| m.id == id)
                    .map(|m| m.family_id)
            };
            let left = family_of(rel.member1_id);
            assert!(left.is_some());
            assert_eq!(left, family_of(rel.member2_id));
        }
    }
}
