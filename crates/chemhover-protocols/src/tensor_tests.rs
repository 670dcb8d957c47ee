use super::*;

#[test]
fn test_from_rows_pads_short_rows() {
    let tensor = Tensor::from_rows(&[vec![1, 2, 3], vec![4]]).unwrap();
    assert_eq!(tensor.shape(), (2, 3));
    assert_eq!(tensor.row(0), &[1, 2, 3]);
    assert_eq!(tensor.row(1), &[4, Tensor::PADDING, Tensor::PADDING]);
}

#[test]
fn test_from_rows_all_empty_is_none() {
    assert!(Tensor::from_rows(&[vec![], vec![]]).is_none());
    assert!(Tensor::from_rows(&[]).is_none());
}

#[test]
fn test_from_rows_keeps_empty_rows() {
    let tensor = Tensor::from_rows(&[vec![], vec![7, 8]]).unwrap();
    assert_eq!(tensor.shape(), (2, 2));
    assert_eq!(tensor.row(0), &[0, 0]);
}

#[test]
fn test_get_out_of_bounds() {
    let tensor = Tensor::zeros(2, 2);
    assert_eq!(tensor.get(1, 1), Some(0));
    assert_eq!(tensor.get(2, 0), None);
    assert_eq!(tensor.get(0, 2), None);
}

#[test]
fn test_iter_rows_in_order() {
    let tensor = Tensor::from_rows(&[vec![1], vec![2], vec![3]]).unwrap();
    let firsts: Vec<i32> = tensor.iter_rows().map(|r| r[0]).collect();
    assert_eq!(firsts, vec![1, 2, 3]);
}

#[test]
fn test_byte_len() {
    let tensor = Tensor::zeros(3, 4);
    assert_eq!(tensor.byte_len(), 48);
}
