//! The [`VoxelSet`] bitset over linear voxel indices.

/// A set of linear voxel indices implemented as a `u64`-word bitset.
///
/// Backs the active-phase mask: membership tests sit on the stepper's hot
/// path, so the representation is a flat word array rather than a hash
/// set. Set algebra is provided for composing masks (e.g. intersecting a
/// phase mask with a region of interest).
#[derive(Clone, Debug, Default)]
pub struct VoxelSet {
    words: Vec<u64>,
}

impl VoxelSet {
    const BITS_PER_WORD: usize = 64;

    /// Create an empty set.
    pub fn empty() -> Self {
        Self { words: Vec::new() }
    }

    /// Insert a voxel index.
    pub fn insert(&mut self, idx: usize) {
        let word = idx / Self::BITS_PER_WORD;
        let bit = idx % Self::BITS_PER_WORD;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << bit;
    }

    /// Whether the set contains a voxel index.
    pub fn contains(&self, idx: usize) -> bool {
        let word = idx / Self::BITS_PER_WORD;
        let bit = idx % Self::BITS_PER_WORD;
        word < self.words.len() && (self.words[word] & (1u64 << bit)) != 0
    }

    /// The union of two sets (`self | other`).
    pub fn union(&self, other: &Self) -> Self {
        let max_len = self.words.len().max(other.words.len());
        let mut words = Vec::with_capacity(max_len);
        for i in 0..max_len {
            let a = self.words.get(i).copied().unwrap_or(0);
            let b = other.words.get(i).copied().unwrap_or(0);
            words.push(a | b);
        }
        Self { words }
    }

    /// The intersection of two sets (`self & other`).
    pub fn intersection(&self, other: &Self) -> Self {
        let min_len = self.words.len().min(other.words.len());
        let mut words = Vec::with_capacity(min_len);
        for i in 0..min_len {
            words.push(self.words[i] & other.words[i]);
        }
        while words.last() == Some(&0) {
            words.pop();
        }
        Self { words }
    }

    /// The set difference (`self - other`).
    pub fn difference(&self, other: &Self) -> Self {
        let mut words = Vec::with_capacity(self.words.len());
        for i in 0..self.words.len() {
            let b = other.words.get(i).copied().unwrap_or(0);
            words.push(self.words[i] & !b);
        }
        while words.last() == Some(&0) {
            words.pop();
        }
        Self { words }
    }

    /// Whether `self` is a subset of `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        for i in 0..self.words.len() {
            let b = other.words.get(i).copied().unwrap_or(0);
            if self.words[i] & !b != 0 {
                return false;
            }
        }
        true
    }

    /// Whether the set contains no voxels.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Number of voxels in the set.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate over the voxel indices in ascending order.
    pub fn iter(&self) -> VoxelSetIter<'_> {
        VoxelSetIter {
            words: &self.words,
            word_idx: 0,
            bit_idx: 0,
        }
    }
}

impl PartialEq for VoxelSet {
    fn eq(&self, other: &Self) -> bool {
        let max_len = self.words.len().max(other.words.len());
        for i in 0..max_len {
            let a = self.words.get(i).copied().unwrap_or(0);
            let b = other.words.get(i).copied().unwrap_or(0);
            if a != b {
                return false;
            }
        }
        true
    }
}

impl Eq for VoxelSet {}

impl FromIterator<usize> for VoxelSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Self::empty();
        for idx in iter {
            set.insert(idx);
        }
        set
    }
}

impl<'a> IntoIterator for &'a VoxelSet {
    type Item = usize;
    type IntoIter = VoxelSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the indices in a [`VoxelSet`], ascending.
pub struct VoxelSetIter<'a> {
    words: &'a [u64],
    word_idx: usize,
    bit_idx: usize,
}

impl Iterator for VoxelSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.word_idx < self.words.len() {
            let word = self.words[self.word_idx];
            while self.bit_idx < 64 {
                let bit = self.bit_idx;
                self.bit_idx += 1;
                if word & (1u64 << bit) != 0 {
                    return Some(self.word_idx * 64 + bit);
                }
            }
            self.word_idx += 1;
            self.bit_idx = 0;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_voxel_set() -> impl Strategy<Value = VoxelSet> {
        prop::collection::vec(0usize..512, 0..64)
            .prop_map(|ids| ids.into_iter().collect::<VoxelSet>())
    }

    #[test]
    fn empty_set_has_no_members() {
        let s = VoxelSet::empty();
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert!(!s.contains(0));
        assert!(!s.contains(1000));
    }

    #[test]
    fn iter_is_ascending() {
        let s: VoxelSet = [200, 3, 64, 63, 65].into_iter().collect();
        let order: Vec<usize> = s.iter().collect();
        assert_eq!(order, vec![3, 63, 64, 65, 200]);
    }

    proptest! {
        #[test]
        fn union_commutative(a in arb_voxel_set(), b in arb_voxel_set()) {
            prop_assert_eq!(a.union(&b), b.union(&a));
        }

        #[test]
        fn intersection_commutative(a in arb_voxel_set(), b in arb_voxel_set()) {
            prop_assert_eq!(a.intersection(&b), b.intersection(&a));
        }

        #[test]
        fn union_associative(
            a in arb_voxel_set(),
            b in arb_voxel_set(),
            c in arb_voxel_set(),
        ) {
            prop_assert_eq!(a.union(&b).union(&c), a.union(&b.union(&c)));
        }

        #[test]
        fn union_identity(a in arb_voxel_set()) {
            prop_assert_eq!(a.union(&VoxelSet::empty()), a.clone());
        }

        #[test]
        fn union_idempotent(a in arb_voxel_set()) {
            prop_assert_eq!(a.union(&a), a.clone());
        }

        #[test]
        fn intersection_with_empty(a in arb_voxel_set()) {
            prop_assert_eq!(a.intersection(&VoxelSet::empty()), VoxelSet::empty());
        }

        #[test]
        fn difference_removes_common(a in arb_voxel_set(), b in arb_voxel_set()) {
            let diff = a.difference(&b);
            for idx in diff.iter() {
                prop_assert!(a.contains(idx), "diff element {idx} not in a");
                prop_assert!(!b.contains(idx), "diff element {idx} in b");
            }
        }

        #[test]
        fn subset_reflexive(a in arb_voxel_set()) {
            prop_assert!(a.is_subset(&a));
        }

        #[test]
        fn empty_is_subset(a in arb_voxel_set()) {
            prop_assert!(VoxelSet::empty().is_subset(&a));
        }

        #[test]
        fn insert_contains(idx in 0usize..4096) {
            let mut set = VoxelSet::empty();
            set.insert(idx);
            prop_assert!(set.contains(idx));
            prop_assert_eq!(set.len(), 1);
        }

        #[test]
        fn len_matches_iter_count(a in arb_voxel_set()) {
            prop_assert_eq!(a.len(), a.iter().count());
        }
    }
}
