use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic label assigned to a whole task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Colour,
    CommonSense,
    Geometry,
    Movement,
    Number,
    Object,
}

impl Category {
    /// Fixed enumeration order. Argmax ties resolve to the earliest entry.
    pub const ALL: [Category; 6] = [
        Category::Colour,
        Category::CommonSense,
        Category::Geometry,
        Category::Movement,
        Category::Number,
        Category::Object,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Colour => "Colour",
            Category::CommonSense => "CommonSense",
            Category::Geometry => "Geometry",
            Category::Movement => "Movement",
            Category::Number => "Number",
            Category::Object => "Object",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
