/*
 * @Description  : 模型保存/加载的单元测试
 */

use std::fs;
use std::path::PathBuf;

use super::leaf;
use crate::matrix::Matrix;
use crate::nn::GraphError;
use crate::nn::model::{Model, ModelError};
use crate::preprocess::{AnyScaler, MinMaxScaler, Scaler};

/// 每个测试使用独立的临时文件
fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("lazy_grad_{}_{name}.json", std::process::id()))
}

#[test]
fn test_save_load_round_trip() {
    let path = temp_path("round_trip");
    let w = leaf("w", &[0.5, -1.25, 3., 0.125], 2, 2);
    let b = leaf("b", &[1., -2.], 1, 2);
    let mut scaler = MinMaxScaler::new(2, vec![vec![0, 1]]).unwrap();
    scaler.fit(&Matrix::new(&[0., 2., 4., 8.], 2, 2)).unwrap();
    Model::new(&[w.clone(), b.clone()])
        .with_scaler(scaler.clone())
        .save(&path)
        .unwrap();

    // 另一组同名参数（顺序不同）按名字加载
    let b2 = leaf("b", &[0., 0.], 1, 2);
    let w2 = leaf("w", &[0., 0., 0., 0.], 2, 2);
    let mut model = Model::new(&[b2.clone(), w2.clone()]);
    assert!(model.load(&path).unwrap());
    assert_eq!(w2.value(), w.value());
    assert_eq!(b2.value(), b.value());
    assert_eq!(model.scaler(), Some(&AnyScaler::from(scaler)));

    let json = fs::read_to_string(&path).unwrap();
    assert!(json.contains(r#""name": "w""#));
    assert!(json.contains(r#""rows": 2"#));
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_load_missing_file_is_not_fatal() {
    let w = leaf("w", &[1., 2.], 1, 2);
    let mut model = Model::new(&[w.clone()]);
    assert!(!model.load(temp_path("missing")).unwrap());
    assert_eq!(w.value(), Matrix::new(&[1., 2.], 1, 2));
}

#[test]
fn test_load_shape_mismatch() {
    let path = temp_path("shape_mismatch");
    Model::new(&[leaf("w", &[1., 2.], 1, 2)]).save(&path).unwrap();

    let w = leaf("w", &[1., 2.], 2, 1);
    let result = Model::new(&[w.clone()]).load(&path);
    fs::remove_file(&path).unwrap();
    assert!(matches!(
        result,
        Err(ModelError::Graph(GraphError::ShapeMismatch { .. }))
    ));
    assert_eq!(w.value(), Matrix::new(&[1., 2.], 2, 1));
}

#[test]
fn test_load_malformed_file() {
    let path = temp_path("malformed");
    fs::write(
        &path,
        r#"{"parameters":[{"name":"w","value":{"rows":2,"cols":2,"data":[1.0]}}]}"#,
    )
    .unwrap();
    let result = Model::new(&[leaf("w", &[0.; 4], 2, 2)]).load(&path);
    fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(ModelError::Json(_))));
}
