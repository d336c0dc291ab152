//! Encounter type to visit type mapping.
//!
//! The mapping lives in the `visits.encounterTypeToVisitTypeMapping` global
//! property as a comma separated list of `encounterType:visitType` pairs.
//! Either side may be a numeric id or a uuid, e.g. `"3:4, 5:2, 1:2"`.

use medrec_core::{EncounterType, VisitType, is_numeric_id};
use tracing::warn;

use crate::directory::VisitTypeDirectory;
use crate::{ServiceError, ServiceResult};

/// Reference to a visit type by id or uuid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitTypeRef {
    Id(i32),
    Uuid(String),
}

impl VisitTypeRef {
    /// All-digit values are ids, anything else is a uuid. An empty value or
    /// an id that does not fit in an `i32` is a configuration error.
    pub fn parse(value: &str) -> ServiceResult<Self> {
        if value.is_empty() || is_numeric_id(value) {
            return value.parse().map(Self::Id).map_err(|_| {
                ServiceError::configuration(format!("Invalid visit type id in mapping: '{value}'"))
            });
        }
        Ok(Self::Uuid(value.to_string()))
    }

    pub async fn resolve(
        &self,
        directory: &dyn VisitTypeDirectory,
    ) -> ServiceResult<Option<VisitType>> {
        match self {
            Self::Id(id) => directory.visit_type(*id).await,
            Self::Uuid(uuid) => directory.visit_type_by_uuid(uuid).await,
        }
    }
}

/// One `key:value` pair of the mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Encounter type id (decimal) or uuid
    pub encounter_type: String,
    /// Raw visit type id or uuid
    pub visit_type: String,
}

impl MappingEntry {
    pub fn matches(&self, encounter_type: &EncounterType) -> bool {
        self.encounter_type == encounter_type.encounter_type_id.to_string()
            || self.encounter_type == encounter_type.uuid
    }
}

/// Split a mapping value into entries in declared order.
///
/// Entries are split at the first `:`. Entries with no `:` or an empty key
/// are skipped.
pub fn parse_mapping(value: &str) -> Vec<MappingEntry> {
    value
        .split(',')
        .filter_map(|raw| {
            let entry = raw
                .split_once(':')
                .map(|(key, value)| (key.trim(), value.trim()))
                .filter(|(key, _)| !key.is_empty());
            match entry {
                Some((key, value)) => Some(MappingEntry {
                    encounter_type: key.to_string(),
                    visit_type: value.to_string(),
                }),
                None => {
                    if !raw.trim().is_empty() {
                        warn!(entry = %raw.trim(), "Skipping malformed visit type mapping entry");
                    }
                    None
                }
            }
        })
        .collect()
}

/// Resolve the visit type for `encounter_type` from a mapping value.
///
/// A blank mapping falls back to the first visit type in the directory.
/// A non-blank mapping with no resolvable entry for the encounter type is a
/// configuration error.
pub async fn resolve_visit_type(
    mapping: &str,
    encounter_type: &EncounterType,
    directory: &dyn VisitTypeDirectory,
) -> ServiceResult<VisitType> {
    if mapping.trim().is_empty() {
        return directory
            .all_visit_types()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::configuration("No visit types are defined"));
    }

    for entry in parse_mapping(mapping) {
        if !entry.matches(encounter_type) {
            continue;
        }
        let reference = VisitTypeRef::parse(&entry.visit_type)?;
        if let Some(visit_type) = reference.resolve(directory).await? {
            return Ok(visit_type);
        }
    }

    Err(ServiceError::configuration(format!(
        "Global Property: {} does not have a mapping for encounter type: {}",
        medrec_config::names::GP_ENCOUNTER_TYPE_TO_VISIT_TYPE_MAPPING,
        encounter_type.name
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryDirectory;

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::with_types(
            [
                VisitType::new(4, "Initial HIV Clinic Visit"),
                VisitType::new(2, "Return TB Clinic Visit").with_uuid("759799ab-c9a5-435e-b671-77773ada74e4"),
                VisitType::new(1, "Initial TB Clinic Visit"),
            ],
            Vec::<EncounterType>::new(),
        )
    }

    #[test]
    fn test_parse_mapping() {
        let entries = parse_mapping("3:4, 5:2,bad, :7,1:2 ");
        assert_eq!(
            entries,
            vec![
                MappingEntry {
                    encounter_type: "3".into(),
                    visit_type: "4".into()
                },
                MappingEntry {
                    encounter_type: "5".into(),
                    visit_type: "2".into()
                },
                MappingEntry {
                    encounter_type: "1".into(),
                    visit_type: "2".into()
                },
            ]
        );
    }

    #[test]
    fn test_parse_mapping_splits_at_first_colon() {
        let entries = parse_mapping("a:b:c");
        assert_eq!(entries[0].encounter_type, "a");
        assert_eq!(entries[0].visit_type, "b:c");
    }

    #[test]
    fn test_visit_type_ref() {
        assert_eq!(VisitTypeRef::parse("42").unwrap(), VisitTypeRef::Id(42));
        assert_eq!(
            VisitTypeRef::parse("abc-1").unwrap(),
            VisitTypeRef::Uuid("abc-1".into())
        );
        assert!(VisitTypeRef::parse("").unwrap_err().is_configuration_error());
        assert!(
            VisitTypeRef::parse("99999999999")
                .unwrap_err()
                .is_configuration_error()
        );
    }

    #[test]
    fn test_entry_matches_id_or_uuid() {
        let et = EncounterType::new(5, "Return").with_uuid("et-5");
        let by_id = MappingEntry {
            encounter_type: "5".into(),
            visit_type: "2".into(),
        };
        let by_uuid = MappingEntry {
            encounter_type: "et-5".into(),
            visit_type: "2".into(),
        };
        let other = MappingEntry {
            encounter_type: "6".into(),
            visit_type: "2".into(),
        };
        assert!(by_id.matches(&et));
        assert!(by_uuid.matches(&et));
        assert!(!other.matches(&et));
    }

    #[tokio::test]
    async fn test_resolves_by_id() {
        let dir = directory();
        let vt = resolve_visit_type("3:4, 5:2, 1:2", &EncounterType::new(5, "Return"), &dir)
            .await
            .unwrap();
        assert_eq!(vt.visit_type_id, 2);
    }

    #[tokio::test]
    async fn test_resolves_uuids_on_both_sides() {
        let dir = directory();
        let et = EncounterType::new(7, "Lab").with_uuid("07000be2-26b6-4cce-8b40-866d8435b613");
        let vt = resolve_visit_type(
            "07000be2-26b6-4cce-8b40-866d8435b613:759799ab-c9a5-435e-b671-77773ada74e4",
            &et,
            &dir,
        )
        .await
        .unwrap();
        assert_eq!(vt.visit_type_id, 2);
    }

    #[tokio::test]
    async fn test_first_resolvable_entry_wins() {
        let dir = directory();
        let vt = resolve_visit_type("5:99, 5:1, 5:4", &EncounterType::new(5, "Return"), &dir)
            .await
            .unwrap();
        assert_eq!(vt.visit_type_id, 1);
    }

    #[tokio::test]
    async fn test_unparseable_visit_type_fails_instead_of_falling_through() {
        let dir = directory();
        let et = EncounterType::new(5, "Return");
        for mapping in ["5:, 5:2", "5:99999999999, 5:2"] {
            let err = resolve_visit_type(mapping, &et, &dir).await.unwrap_err();
            assert!(err.is_configuration_error(), "{mapping}");
        }

        // entries for other encounter types are not parsed
        let vt = resolve_visit_type("3:, 5:2", &et, &dir).await.unwrap();
        assert_eq!(vt.visit_type_id, 2);
    }

    #[tokio::test]
    async fn test_unmapped_encounter_type_is_an_error() {
        let dir = directory();
        let err = resolve_visit_type("3:4, 5:2, 1:2", &EncounterType::new(9, "Pharmacy"), &dir)
            .await
            .unwrap_err();
        assert!(err.is_configuration_error());
        assert_eq!(
            err.to_string(),
            "Global Property: visits.encounterTypeToVisitTypeMapping does not have a mapping for encounter type: Pharmacy"
        );
    }

    #[tokio::test]
    async fn test_blank_mapping_uses_first_visit_type() {
        let dir = directory();
        let vt = resolve_visit_type("  ", &EncounterType::new(9, "Pharmacy"), &dir)
            .await
            .unwrap();
        assert_eq!(vt.visit_type_id, 4);
    }

    #[tokio::test]
    async fn test_blank_mapping_without_visit_types() {
        let dir = InMemoryDirectory::new();
        let err = resolve_visit_type("", &EncounterType::new(9, "Pharmacy"), &dir)
            .await
            .unwrap_err();
        assert!(err.is_configuration_error());
    }
}
