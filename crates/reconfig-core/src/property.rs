//! Value-typed module properties.
//!
//! Properties are plain tagged values owned by the module record and by
//! every configuration entry that carries them. The search only needs them to be comparable
//! and hashable; it never inspects their contents.

use smallvec::SmallVec;
use std::fmt;

/// An RGB module color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Construct a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packed `0xRRGGBB` representation, used as the palette key on export.
    pub fn as_int(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Inverse of [`as_int`](Self::as_int). Bits above 24 are ignored.
    pub fn from_int(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xff) as u8,
            g: ((v >> 8) & 0xff) as u8,
            b: (v & 0xff) as u8,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// One property attached to a module. One variant per property kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleProperty {
    /// Module color (`colorProperty` in scenario files).
    Color(Color),
}

impl ModuleProperty {
    /// Registration key of this property kind.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Color(_) => "colorProperty",
        }
    }
}

/// The set of properties carried by one module, at most one per kind.
///
/// Kept sorted so that derived equality, ordering, and hashing are
/// independent of insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertySet(SmallVec<[ModuleProperty; 1]>);

impl PropertySet {
    /// An empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `prop`, replacing any existing property of the same kind.
    pub fn insert(&mut self, prop: ModuleProperty) {
        self.0.retain(|p| p.key() != prop.key());
        let pos = self.0.partition_point(|p| *p < prop);
        self.0.insert(pos, prop);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, prop: ModuleProperty) -> Self {
        self.insert(prop);
        self
    }

    /// Whether no properties are attached.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of attached properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over attached properties in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleProperty> {
        self.0.iter()
    }

    /// The module color, if one is attached.
    pub fn color(&self) -> Option<Color> {
        self.0.iter().find_map(|p| match p {
            ModuleProperty::Color(c) => Some(*c),
        })
    }
}

impl FromIterator<ModuleProperty> for PropertySet {
    fn from_iter<I: IntoIterator<Item = ModuleProperty>>(iter: I) -> Self {
        let mut set = Self::new();
        for p in iter {
            set.insert(p);
        }
        set
    }
}
