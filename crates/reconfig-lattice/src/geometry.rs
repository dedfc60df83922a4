//! Lattice dimensions and flat-index arithmetic.
//!
//! The dense grid spans `axis_size + 2 * padding` cells along every axis.
//! Caller-facing coordinates address the interior `0..axis_size`; the
//! padding margin sits at negative and `>= axis_size` coordinates and is
//! filled with boundary cells at construction.

use crate::error::LatticeError;
use reconfig_core::Coord;
use smallvec::SmallVec;

/// Builder input for a [`Geometry`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LatticeConfig {
    /// Number of dimensions (2 or 3 in practice).
    pub order: usize,
    /// Interior extent along every axis.
    pub axis_size: u32,
    /// Boundary margin added on both sides of every axis. Default: 0.
    pub padding: u32,
}

impl LatticeConfig {
    /// Configuration with no padding.
    pub fn new(order: usize, axis_size: u32) -> Self {
        Self {
            order,
            axis_size,
            padding: 0,
        }
    }

    /// Builder-style padding override.
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Check structural invariants without allocating.
    pub fn validate(&self) -> Result<(), LatticeError> {
        if self.order == 0 || self.order > Geometry::MAX_ORDER {
            return Err(LatticeError::InvalidGeometry {
                reason: format!(
                    "order must be in 1..={}, got {}",
                    Geometry::MAX_ORDER,
                    self.order
                ),
            });
        }
        if self.axis_size == 0 {
            return Err(LatticeError::InvalidGeometry {
                reason: "axis_size must be at least 1".into(),
            });
        }
        extent_and_count(self)?;
        Ok(())
    }
}

fn extent_and_count(config: &LatticeConfig) -> Result<(u32, usize), LatticeError> {
    let extent = config
        .padding
        .checked_mul(2)
        .and_then(|p| p.checked_add(config.axis_size))
        .filter(|e| *e <= i32::MAX as u32)
        .ok_or_else(|| LatticeError::InvalidGeometry {
            reason: format!(
                "axis_size {} with padding {} overflows",
                config.axis_size, config.padding
            ),
        })?;
    let mut count: usize = 1;
    for _ in 0..config.order {
        count = count
            .checked_mul(extent as usize)
            .filter(|c| *c <= u32::MAX as usize)
            .ok_or_else(|| LatticeError::InvalidGeometry {
                reason: format!("{extent}^{} cells exceeds u32::MAX", config.order),
            })?;
    }
    Ok((extent, count))
}

/// Dimensions of a dense lattice and the coordinate ↔ index mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Geometry {
    order: usize,
    axis_size: u32,
    padding: u32,
    extent: u32,
    strides: SmallVec<[usize; 4]>,
    cell_count: usize,
}

impl Geometry {
    /// Highest supported lattice order.
    pub const MAX_ORDER: usize = 6;

    /// Validate `config` and precompute strides.
    pub fn new(config: &LatticeConfig) -> Result<Self, LatticeError> {
        config.validate()?;
        let (extent, cell_count) = extent_and_count(config)?;
        let mut strides = SmallVec::with_capacity(config.order);
        let mut stride = 1usize;
        for _ in 0..config.order {
            strides.push(stride);
            stride *= extent as usize;
        }
        Ok(Self {
            order: config.order,
            axis_size: config.axis_size,
            padding: config.padding,
            extent,
            strides,
            cell_count,
        })
    }

    /// Number of dimensions.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Interior extent along each axis.
    pub fn axis_size(&self) -> u32 {
        self.axis_size
    }

    /// Boundary margin on each side.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Total cells in the dense grid, margin included.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Flat index of `coord`, or `None` if it lies outside the grid
    /// (margin included) or has the wrong length.
    #[inline]
    pub fn index_of(&self, coord: &[i32]) -> Option<u32> {
        if coord.len() != self.order {
            return None;
        }
        let pad = self.padding as i64;
        let extent = self.extent as i64;
        let mut index = 0usize;
        for (axis, &c) in coord.iter().enumerate() {
            let shifted = c as i64 + pad;
            if shifted < 0 || shifted >= extent {
                return None;
            }
            index += shifted as usize * self.strides[axis];
        }
        Some(index as u32)
    }

    /// Inverse of [`index_of`](Self::index_of).
    pub fn coord_of(&self, index: u32) -> Coord {
        let mut rest = index as usize;
        let extent = self.extent as usize;
        let mut out = Coord::with_capacity(self.order);
        for _ in 0..self.order {
            out.push((rest % extent) as i32 - self.padding as i32);
            rest /= extent;
        }
        out
    }

    /// Whether `coord` addresses an interior (non-margin) cell.
    pub fn in_interior(&self, coord: &[i32]) -> bool {
        coord.len() == self.order
            && coord
                .iter()
                .all(|&c| c >= 0 && (c as i64) < self.axis_size as i64)
    }

    /// Whether the flat index lies in the padding margin.
    pub fn is_margin(&self, index: u32) -> bool {
        !self.in_interior(&self.coord_of(index))
    }

    /// Flat index of an interior coordinate, or a descriptive error.
    pub fn check_interior(&self, coord: &[i32]) -> Result<u32, LatticeError> {
        if coord.len() != self.order {
            return Err(LatticeError::DimensionMismatch {
                expected: self.order,
                got: coord.len(),
            });
        }
        if !self.in_interior(coord) {
            return Err(LatticeError::CoordOutOfBounds {
                coord: Coord::from_slice(coord),
                bounds: format!("each axis in [0, {})", self.axis_size),
            });
        }
        // In-interior implies in-grid.
        self.index_of(coord)
            .ok_or_else(|| LatticeError::CoordOutOfBounds {
                coord: Coord::from_slice(coord),
                bounds: format!("each axis in [0, {})", self.axis_size),
            })
    }
}
