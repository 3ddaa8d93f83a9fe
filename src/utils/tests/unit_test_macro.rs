use crate::errors::{MatrixError, Operator};
use crate::nn::GraphError;
use crate::{assert_err, assert_panic};

#[test]
fn test_assert_panic_macro() {
    assert_panic!(panic!("test panic"));
    assert_panic!(panic!("custom test panic msg"), "custom test panic msg");
}

#[test]
fn test_assert_err_macro() {
    let invalid: Result<(), GraphError> = Err(GraphError::InvalidOperation("消息".to_string()));
    assert_err!(invalid);
    assert_err!(invalid, GraphError::InvalidOperation("消息"));

    let shape: Result<(), GraphError> = Err(GraphError::ShapeMismatch {
        expected: (2, 2),
        got: (3, 2),
        message: "消息".to_string(),
    });
    assert_err!(shape, GraphError::ShapeMismatch((2, 2), (3, 2), "消息"));

    let matrix: Result<(), MatrixError> = Err(MatrixError::ShapeMismatch {
        operator: Operator::Add,
        left: (2, 3),
        right: (3, 2),
    });
    assert_err!(matrix, MatrixError::ShapeMismatch { left, .. } if *left == (2, 3));
}

#[test]
fn test_assert_err_macro_rejects_ok() {
    let ok: Result<u8, GraphError> = Ok(1);
    assert_panic!(assert_err!(ok, GraphError::InvalidOperation(_)));
}
