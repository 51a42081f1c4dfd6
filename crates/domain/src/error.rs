use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    MismatchedNormals { positions: usize, normals: usize },
    IndexOutOfRange { index: u32, vertex_count: usize },
    CatalogAlreadyRequested,
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MismatchedNormals { positions, normals } => write!(
                f,
                "mesh has {positions} positions but {normals} normals"
            ),
            Self::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(
                f,
                "mesh index {index} is out of range for {vertex_count} vertices"
            ),
            Self::CatalogAlreadyRequested => write!(f, "catalog has already been requested"),
        }
    }
}

impl std::error::Error for DomainError {}
