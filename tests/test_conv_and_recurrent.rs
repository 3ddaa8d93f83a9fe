/*
 * @Description  : 卷积网络与按时间步展开的循环网络的端到端测试
 *                 1. CNN：Conv -> ReLU -> Pool -> Reshape -> GradThreshold -> 全连接 -> Softmax -> CrossEntropyLoss，
 *                    用Adam区分“竖线”与“横线”两类图案
 *                 2. 展开的循环网络：RowSlice取每个时间步的输入，与隐状态HConcat后经全连接+Tanh，
 *                    对整个展开图做有限差分梯度校验
 */
use lazy_grad::matrix::Matrix;
use lazy_grad::nn::grad_check::check_gradient;
use lazy_grad::nn::{Adam, GraphError, GraphInstance, Init, NeuralNetwork, Node, Variable};
use rand::SeedableRng;
use rand::rngs::StdRng;

const IMAGE_SIZE: usize = 6;

/// 6×6图像，第`index`列（竖线）或第`index`行（横线）为1
fn line_image(vertical: bool, index: usize) -> Vec<f64> {
    let mut image = vec![0.; IMAGE_SIZE * IMAGE_SIZE];
    for i in 0..IMAGE_SIZE {
        let (r, c) = if vertical { (i, index) } else { (index, i) };
        image[r * IMAGE_SIZE + c] = 1.;
    }
    image
}

#[test]
fn test_cnn_classifies_line_orientation() -> Result<(), GraphError> {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = StdRng::seed_from_u64(7);
    let kernel = Variable::random("kernel", 3, 3, &Init::XavierNormal, &mut rng)?;
    let w = Variable::random("w", 9, 2, &Init::XavierNormal, &mut rng)?;
    let b = Variable::from_matrix("b", Matrix::zeros(1, 2));
    let params = [kernel.clone(), w.clone(), b.clone()];

    let builder = move || {
        let input = Variable::new("image", IMAGE_SIZE, IMAGE_SIZE);
        let target = Variable::new("label", 1, 2);
        let features = Node::pool(&Node::relu(&Node::conv(&input, &kernel, 1)), 2, 2, 2);
        let flat = Node::grad_threshold(&Node::reshape(&features, 1, 9), 0.);
        let output = Node::softmax(&Node::add(&Node::multi(&flat, &w), &b));
        let loss = Node::cross_entropy_loss(&output, &target);
        GraphInstance {
            input,
            target,
            output,
            loss,
        }
    };
    let mut network = NeuralNetwork::new(builder, Adam::new_default(&params, 0.05));

    let mut inputs = Vec::new();
    let mut targets = Vec::new();
    for index in [1, 4] {
        inputs.push(line_image(true, index));
        targets.push(vec![1., 0.]);
        inputs.push(line_image(false, index));
        targets.push(vec![0., 1.]);
    }

    let (initial_loss, _) = network.evaluate(&inputs, &targets)?;
    for _ in 0..200 {
        network.train(&inputs, &targets, 4)?;
    }
    let (final_loss, outputs) = network.evaluate(&inputs, &targets)?;
    println!("初始损失 {initial_loss:.6}，最终损失 {final_loss:.6}");
    assert!(final_loss < initial_loss * 0.5);

    // 输出是概率分布
    for output in &outputs {
        assert_eq!(output.len(), 2);
        assert!((output.iter().sum::<f64>() - 1.).abs() < 1e-9);
    }
    Ok(())
}

#[test]
fn test_unrolled_recurrent_gradient() {
    let mut rng = StdRng::seed_from_u64(3);
    let (steps, input_dim, hidden_dim) = (3, 2, 3);
    let sequence = Variable::random(
        "sequence",
        steps,
        input_dim,
        &Init::Uniform { min: -1., max: 1. },
        &mut rng,
    )
    .unwrap();
    let w = Variable::random(
        "w",
        input_dim + hidden_dim,
        hidden_dim,
        &Init::XavierNormal,
        &mut rng,
    )
    .unwrap();
    let b = Variable::from_matrix("b", Matrix::constant(1, hidden_dim, 0.1));
    let v = Variable::random("v", hidden_dim, 1, &Init::XavierNormal, &mut rng).unwrap();
    let target = Variable::from_matrix("target", Matrix::new(&[0.5], 1, 1));

    // h_t = tanh([x_t, h_{t-1}] · w + b)，各时间步共享w与b
    let mut h = Variable::from_matrix("h0", Matrix::zeros(1, hidden_dim))
        .node()
        .clone();
    for t in 0..steps {
        let x_t = Node::row_slice(&sequence, t, t + 1);
        let z = Node::add(&Node::multi(&Node::hconcat(&x_t, &h), &w), &b);
        h = Node::tanh_with(&z, 0.);
    }
    let output = Node::sigmoid(&Node::multi(&h, &v));
    let loss = Node::mse_loss(&output, &target);

    check_gradient(
        &loss,
        &[sequence, w.clone(), b.clone(), v.clone()],
        None,
        1e-6,
        1e-4,
    )
    .unwrap();

    // 共享参数在每个时间步都收到梯度，总梯度非零
    loss.backward(None).unwrap();
    assert!(w.gradient().norm_l2() > 0.);
    assert!(b.gradient().norm_l2() > 0.);
}
