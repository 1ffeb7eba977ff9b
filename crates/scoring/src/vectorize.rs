//! Indicator vectors over an ordered skill vocabulary.

use crate::taxonomy::Taxonomy;
use serde::Serialize;
use std::collections::BTreeSet;

/// A 0/1 vector; coordinate `i` is set iff the skill at vocabulary position
/// `i` was present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SkillVector(Vec<f64>);

impl SkillVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// Number of set coordinates.
    pub fn count_ones(&self) -> usize {
        self.0.iter().filter(|v| **v > 0.0).count()
    }

    pub fn is_zero(&self) -> bool {
        self.count_ones() == 0
    }
}

/// Vectorize `skills` over `vocabulary`.
///
/// Skills missing from the vocabulary are dropped without error.
pub fn vectorize<'a, S, V>(skills: S, vocabulary: V) -> SkillVector
where
    S: IntoIterator<Item = &'a str>,
    V: IntoIterator<Item = &'a str>,
{
    let present: BTreeSet<&str> = skills.into_iter().collect();
    SkillVector(
        vocabulary
            .into_iter()
            .map(|skill| if present.contains(skill) { 1.0 } else { 0.0 })
            .collect(),
    )
}

/// Vectorize `skills` over the taxonomy's full vocabulary.
pub fn vectorize_skills<'s, S>(skills: S, taxonomy: &Taxonomy) -> SkillVector
where
    S: IntoIterator<Item = &'s str>,
{
    let mut values = vec![0.0; taxonomy.dimension()];
    for skill in skills {
        if let Some(i) = taxonomy.index_of(skill) {
            values[i] = 1.0;
        }
    }
    SkillVector(values)
}

/// Vectorize the union of skills implied by `roles`.
pub fn vectorize_roles<'a, R>(roles: R, taxonomy: &Taxonomy) -> SkillVector
where
    R: IntoIterator<Item = &'a str>,
{
    let skills = taxonomy.skills_for_roles(roles);
    vectorize_skills(skills.iter().map(String::as_str), taxonomy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VOCAB: [&str; 3] = ["A", "B", "C"];

    #[test]
    fn vectorize_marks_present_skills() {
        let v = vectorize(["A", "C"], VOCAB);
        assert_eq!(v.as_slice(), &[1.0, 0.0, 1.0]);
        assert_eq!(v.count_ones(), 2);
        assert_eq!(v.dimension(), 3);
    }

    #[test]
    fn vectorize_drops_unknown_skills() {
        let v = vectorize(["A", "Z", "Cobol"], VOCAB);
        assert_eq!(v.as_slice(), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn vectorize_empty_set_is_zero() {
        assert!(vectorize(Vec::<&str>::new(), VOCAB).is_zero());
    }

    #[test]
    fn vectorize_is_case_sensitive() {
        assert!(vectorize(["a", "b"], VOCAB).is_zero());
    }

    #[test]
    fn vectorize_skills_uses_taxonomy_order() {
        let tax = Taxonomy::new(
            "t",
            ["C", "A", "B"],
            Vec::<(String, Vec<String>)>::new(),
        )
        .unwrap();
        let v = vectorize_skills(["A", "Unknown"], &tax);
        assert_eq!(v.as_slice(), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn vectorize_roles_uses_role_union() {
        let tax = Taxonomy::new(
            "t",
            VOCAB,
            [
                ("X".to_string(), vec!["A", "Off-vocabulary"]),
                ("Y".to_string(), vec!["C"]),
            ],
        )
        .unwrap();
        let v = vectorize_roles(["X", "Y", "Ghost"], &tax);
        assert_eq!(v.as_slice(), &[1.0, 0.0, 1.0]);
    }

    proptest! {
        #[test]
        fn vectorize_is_order_independent(mut skills in proptest::collection::vec("[A-E]", 0..8)) {
            let first = vectorize(skills.iter().map(String::as_str), ["A", "B", "C", "D"]);
            skills.reverse();
            let second = vectorize(skills.iter().map(String::as_str), ["A", "B", "C", "D"]);
            prop_assert_eq!(&first, &second);
            let again = vectorize(skills.iter().map(String::as_str), ["A", "B", "C", "D"]);
            prop_assert_eq!(first, again);
        }
    }
}
