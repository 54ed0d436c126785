/// Legality of each cell in row-major order. `true` exactly where the cell is empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MoveMask(Vec<bool>);

impl MoveMask {
    pub fn new(mask: Vec<bool>) -> Self {
        Self(mask)
    }

    pub fn is_legal(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn count_legal(&self) -> usize {
        self.0.iter().filter(|l| **l).count()
    }

    pub fn any_legal(&self) -> bool {
        self.0.iter().any(|l| *l)
    }

    pub fn legal_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, l)| if *l { Some(i) } else { None })
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }
}
