use crate::core::validation::ValidationError;

/// Splits `items` into `parts` contiguous runs.
///
/// Every part holds `len / parts` items and the last `len % parts` parts hold one more,
/// so concatenating the parts in order reproduces `items`. When there are fewer items
/// than parts the leading parts are empty.
pub fn partition<T: Clone>(items: &[T], parts: usize) -> Result<Vec<Vec<T>>, ValidationError> {
    if parts <= 1 {
        return Err(ValidationError::TooFewParts(parts));
    }

    let base = items.len() / parts;
    let remainder = items.len() % parts;
    let mut result = Vec::with_capacity(parts);
    let mut start = 0;
    for index in 0..parts {
        let size = if index >= parts - remainder { base + 1 } else { base };
        result.push(items[start..start + size].to_vec());
        start += size;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::edge::Edge;

    fn sizes<T>(parts: &[Vec<T>]) -> Vec<usize> {
        parts.iter().map(Vec::len).collect()
    }

    #[test]
    fn three_edges_into_two_parts_concatenate_to_the_input() {
        let edges = vec![Edge::new("A", "B"), Edge::new("A", "C"), Edge::new("A", "D")];
        let parts = partition(&edges, 2).unwrap();

        assert_eq!(sizes(&parts), vec![1, 2]);
        assert_eq!(parts.concat(), edges);
    }

    #[test]
    fn remainder_goes_to_the_last_parts() {
        let items: Vec<u32> = (0..10).collect();
        let parts = partition(&items, 4).unwrap();

        assert_eq!(sizes(&parts), vec![2, 2, 3, 3]);
        assert_eq!(parts.concat(), items);
    }

    #[test]
    fn even_split_has_equal_sizes() {
        let items: Vec<u32> = (0..12).collect();
        assert_eq!(sizes(&partition(&items, 3).unwrap()), vec![4, 4, 4]);
    }

    #[test]
    fn fewer_items_than_parts_leaves_leading_parts_empty() {
        let items = vec!['x', 'y'];
        let parts = partition(&items, 5).unwrap();

        assert_eq!(sizes(&parts), vec![0, 0, 0, 1, 1]);
        assert_eq!(parts.concat(), items);
    }

    #[test]
    fn sizes_always_sum_to_the_input_length() {
        for len in 0..20usize {
            for parts in 2..7usize {
                let items: Vec<usize> = (0..len).collect();
                let split = partition(&items, parts).unwrap();
                assert_eq!(split.len(), parts);
                assert_eq!(split.concat(), items);
            }
        }
    }

    #[test]
    fn fewer_than_two_parts_is_rejected() {
        assert_eq!(partition(&[1, 2], 1), Err(ValidationError::TooFewParts(1)));
        assert_eq!(partition(&[1, 2], 0), Err(ValidationError::TooFewParts(0)));
    }
}
