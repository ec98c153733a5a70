//! Impact classification of resource changes
//!
//! Every resource change lands in exactly one [`Category`]. The category of each
//! resource is kept in a side table indexed by its position in the change set,
//! so the input is never modified.

use super::types::{
    ChangeAction, Evaluation, PropertyChangeDetail, RequiresRecreation, ResourceChange,
};

/// Impact bucket of a resource change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Resource will be deleted
    Removed,
    /// Resource will be destroyed and recreated
    Replaced,
    /// Resource will be updated without recreation
    ModifiedInPlace,
    /// Resource will be created
    New,
}

impl Category {
    /// Order of the summary block
    pub const SUMMARY_ORDER: [Category; 4] = [
        Category::Removed,
        Category::Replaced,
        Category::ModifiedInPlace,
        Category::New,
    ];

    /// Order of the detail sections, highest risk first
    pub const DETAIL_ORDER: [Category; 4] = [
        Category::Replaced,
        Category::ModifiedInPlace,
        Category::New,
        Category::Removed,
    ];

    fn slot(&self) -> usize {
        match self {
            Category::Removed => 0,
            Category::Replaced => 1,
            Category::ModifiedInPlace => 2,
            Category::New => 3,
        }
    }

    /// Icon shown next to the logical id in tables and headings
    pub fn marker(&self) -> &'static str {
        match self {
            Category::Removed => "🔴",
            Category::Replaced => "🟠",
            Category::ModifiedInPlace => "🟡",
            Category::New => "🟢",
        }
    }

    /// Short label used in the summary block
    pub fn label(&self) -> &'static str {
        match self {
            Category::Removed => "Removed",
            Category::Replaced => "Replaced",
            Category::ModifiedInPlace => "Modified in place",
            Category::New => "New",
        }
    }

    /// Heading of the detail section for this category
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Removed => "Resources to be removed",
            Category::Replaced => "Resources requiring replacement",
            Category::ModifiedInPlace => "Resources modified in place",
            Category::New => "New resources",
        }
    }
}

/// Decide the category of a single resource change.
///
/// Rules are evaluated in order and the first match wins: removals, then
/// replacements (true or conditional), then additions, everything else is an
/// in-place modification.
pub fn categorize(change: &ResourceChange) -> Category {
    if change.action == Some(ChangeAction::Remove) {
        Category::Removed
    } else if change.replacement.is_replacing() {
        Category::Replaced
    } else if change.action == Some(ChangeAction::Add) {
        Category::New
    } else {
        Category::ModifiedInPlace
    }
}

/// Whether a property change is a cause of resource replacement
pub fn is_replacement_cause(detail: &PropertyChangeDetail) -> bool {
    detail.evaluation == Evaluation::Dynamic
        || matches!(
            detail.requires_recreation,
            RequiresRecreation::Always | RequiresRecreation::Conditionally
        )
}

/// Property changes that explain why a resource is replaced, in API order
pub fn replacement_causes(change: &ResourceChange) -> Vec<&PropertyChangeDetail> {
    change
        .details
        .iter()
        .filter(|detail| is_replacement_cause(detail))
        .collect()
}

/// Result of classifying a change set's resource changes
#[derive(Debug, Clone)]
pub struct Classification<'a> {
    categories: Vec<Category>,
    groups: [Vec<(usize, &'a ResourceChange)>; 4],
}

impl<'a> Classification<'a> {
    /// Resources of a category as `(original_index, change)`, in change set order
    pub fn group(&self, category: Category) -> &[(usize, &'a ResourceChange)] {
        &self.groups[category.slot()]
    }

    pub fn count(&self, category: Category) -> usize {
        self.groups[category.slot()].len()
    }

    /// Category of the resource at `index` in the original change list
    pub fn category_of(&self, index: usize) -> Option<Category> {
        self.categories.get(index).copied()
    }

    /// Total number of classified resources
    pub fn total(&self) -> usize {
        self.categories.len()
    }
}

/// Partition resource changes into the four categories, keeping their order
pub fn classify(changes: &[ResourceChange]) -> Classification<'_> {
    let mut categories = Vec::with_capacity(changes.len());
    let mut groups: [Vec<(usize, &ResourceChange)>; 4] = Default::default();

    for (index, change) in changes.iter().enumerate() {
        let category = categorize(change);
        categories.push(category);
        groups[category.slot()].push((index, change));
    }

    Classification { categories, groups }
}
