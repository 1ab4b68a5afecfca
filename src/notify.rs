//! Change notification for the observable fields of the slider.
//!
//! Every mutating operation returns the [`FieldSet`] it may have touched and
//! hands each of those fields to the registered observers, so a push-update
//! layer can forward them without knowing the driver internals.

use crate::slider::SliderState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Position,
    FilterName,
    Status,
    Console,
    FilterList,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Position,
        Field::FilterName,
        Field::Status,
        Field::Console,
        Field::FilterList,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Position => "position",
            Field::FilterName => "filter_str",
            Field::Status => "status",
            Field::Console => "console",
            Field::FilterList => "filter_list",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldSet(u8);

impl FieldSet {
    pub const EMPTY: FieldSet = FieldSet(0);

    pub const fn of(fields: &[Field]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < fields.len() {
            bits |= fields[i].bit();
            i += 1;
        }
        Self(bits)
    }

    pub fn insert(&mut self, field: Field) {
        self.0 |= field.bit();
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(move |field| self.contains(*field))
    }
}

impl From<Field> for FieldSet {
    fn from(field: Field) -> Self {
        Self(field.bit())
    }
}

impl FromIterator<Field> for FieldSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for field in iter {
            set.insert(field);
        }
        set
    }
}

/// Called once per changed field, after the operation has finished.
pub type Observer = Box<dyn FnMut(Field, &SliderState) + Send>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_set_membership() {
        let set = FieldSet::of(&[Field::Status, Field::Console]);
        assert!(set.contains(Field::Status));
        assert!(set.contains(Field::Console));
        assert!(!set.contains(Field::Position));
        assert!(FieldSet::EMPTY.is_empty());
    }

    #[test]
    fn test_field_set_iterates_in_declaration_order() {
        let set: FieldSet = [Field::FilterList, Field::Position].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Field::Position, Field::FilterList]);
    }
}
