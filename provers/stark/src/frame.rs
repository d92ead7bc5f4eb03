use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsField;

/// A view of the two trace rows a transition constraint reads: the current
/// row and its successor (one base step ahead).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame<F: IsField> {
    data: Vec<FieldElement<F>>,
    row_width: usize,
}

impl<F: IsField> Frame<F> {
    pub fn new(data: Vec<FieldElement<F>>, row_width: usize) -> Self {
        debug_assert_eq!(data.len(), 2 * row_width);
        Self { data, row_width }
    }

    pub fn from_rows(current: Vec<FieldElement<F>>, next: Vec<FieldElement<F>>) -> Self {
        let row_width = current.len();
        let mut data = current;
        data.extend(next);
        Self::new(data, row_width)
    }

    pub fn num_columns(&self) -> usize {
        self.row_width
    }

    pub fn get_row(&self, row_idx: usize) -> &[FieldElement<F>] {
        let row_offset = row_idx * self.row_width;
        &self.data[row_offset..row_offset + self.row_width]
    }
}
