//! Diffing two versions of a profile into the work the change processor applies.

use std::collections::HashSet;

use crate::domain::entities::{CategoryChange, Profile, ProfileChangeResult, names_match};
use crate::domain::types::CategoryGroup;

const GROUPS: [CategoryGroup; 3] = [
    CategoryGroup::Gender,
    CategoryGroup::Language,
    CategoryGroup::Skill,
];

/// Compare `original` with `updated`.
///
/// A banned profile exposes no category values, so banning one emits a removal
/// for everything the original was linked to.
pub fn calculate_changes(original: &Profile, updated: &Profile) -> ProfileChangeResult {
    let before = linked_values(original);
    let after = linked_values(updated);

    let mut category_changes = Vec::new();
    for group in GROUPS {
        for (_, name) in before.iter().filter(|(g, _)| *g == group) {
            if !contains(&after, group, name) {
                category_changes.push(CategoryChange::remove(group, *name));
            }
        }
        for (_, name) in after.iter().filter(|(g, _)| *g == group) {
            if !contains(&before, group, name) {
                category_changes.push(CategoryChange::add(group, *name));
            }
        }
    }

    ProfileChangeResult {
        profile_changed: original != updated,
        category_changes,
    }
}

/// Category values a profile is linked to, deduplicated case-insensitively.
fn linked_values(profile: &Profile) -> Vec<(CategoryGroup, &str)> {
    if profile.is_banned() {
        return Vec::new();
    }

    let gender = profile
        .gender
        .as_deref()
        .map(|gender| (CategoryGroup::Gender, gender));
    let languages = profile
        .languages
        .iter()
        .map(|language| (CategoryGroup::Language, language.as_str()));
    let skills = profile
        .skills
        .iter()
        .map(|skill| (CategoryGroup::Skill, skill.name.as_str()));

    let mut seen = HashSet::new();
    gender
        .into_iter()
        .chain(languages)
        .chain(skills)
        .filter(|(group, name)| !name.trim().is_empty() && seen.insert((*group, name.to_uppercase())))
        .collect()
}

fn contains(values: &[(CategoryGroup, &str)], group: CategoryGroup, name: &str) -> bool {
    values
        .iter()
        .any(|(g, n)| *g == group && names_match(n, name))
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;
    use crate::domain::entities::Skill;
    use crate::domain::types::SkillLevel;

    fn profile() -> Profile {
        let mut profile = Profile::new(Uuid::new_v4(), "Ada", "Lovelace");
        profile.email = "ada@example.com".to_string();
        profile.gender = Some("Female".to_string());
        profile.languages = vec!["English".to_string()];
        profile.skills = vec![skill("Rust")];
        profile
    }

    fn skill(name: &str) -> Skill {
        Skill {
            name: name.to_string(),
            level: SkillLevel::Expert,
            year_started: None,
            year_last_used: None,
        }
    }

    #[test]
    fn identical_profiles_have_no_changes() {
        let original = profile();
        let result = calculate_changes(&original, &original.clone());
        assert!(!result.has_changes());
    }

    #[test]
    fn plain_field_edit_only_flags_the_profile() {
        let original = profile();
        let mut updated = original.clone();
        updated.about = Some("Analyst".to_string());

        let result = calculate_changes(&original, &updated);

        assert!(result.profile_changed);
        assert!(result.category_changes.is_empty());
    }

    #[test]
    fn gender_change_removes_old_and_adds_new() {
        let original = profile();
        let mut updated = original.clone();
        updated.gender = Some("Non-binary".to_string());

        let result = calculate_changes(&original, &updated);

        assert_eq!(
            result.category_changes,
            vec![
                CategoryChange::remove(CategoryGroup::Gender, "Female"),
                CategoryChange::add(CategoryGroup::Gender, "Non-binary"),
            ]
        );
    }

    #[test]
    fn case_only_edits_do_not_move_links() {
        let original = profile();
        let mut updated = original.clone();
        updated.gender = Some("FEMALE".to_string());
        updated.languages = vec!["english".to_string()];
        updated.skills = vec![skill("RUST")];

        let result = calculate_changes(&original, &updated);

        assert!(result.profile_changed);
        assert!(result.category_changes.is_empty());
    }

    #[test]
    fn clearing_gender_removes_its_link() {
        let original = profile();
        let mut updated = original.clone();
        updated.gender = None;

        let result = calculate_changes(&original, &updated);

        assert_eq!(
            result.category_changes,
            vec![CategoryChange::remove(CategoryGroup::Gender, "Female")]
        );
    }

    #[test]
    fn languages_and_skills_use_set_difference() {
        let original = profile();
        let mut updated = original.clone();
        updated.languages = vec!["English".to_string(), "Welsh".to_string()];
        updated.skills = vec![skill("Go")];

        let result = calculate_changes(&original, &updated);

        assert_eq!(
            result.category_changes,
            vec![
                CategoryChange::add(CategoryGroup::Language, "Welsh"),
                CategoryChange::remove(CategoryGroup::Skill, "Rust"),
                CategoryChange::add(CategoryGroup::Skill, "Go"),
            ]
        );
    }

    #[test]
    fn duplicate_values_link_once() {
        let original = Profile::new(Uuid::new_v4(), "Ada", "Lovelace");
        let mut updated = original.clone();
        updated.skills = vec![skill("Rust"), skill("rust")];

        let result = calculate_changes(&original, &updated);

        assert_eq!(
            result.category_changes,
            vec![CategoryChange::add(CategoryGroup::Skill, "Rust")]
        );
    }

    #[test]
    fn banning_removes_every_link() {
        let original = profile();
        let mut updated = original.clone();
        updated.banned_at = Some(OffsetDateTime::now_utc());

        let result = calculate_changes(&original, &updated);

        assert!(result.profile_changed);
        assert_eq!(
            result.category_changes,
            vec![
                CategoryChange::remove(CategoryGroup::Gender, "Female"),
                CategoryChange::remove(CategoryGroup::Language, "English"),
                CategoryChange::remove(CategoryGroup::Skill, "Rust"),
            ]
        );
    }
}
