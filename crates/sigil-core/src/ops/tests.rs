use super::*;
use candle_core::{DType, Device, Tensor};

fn device() -> Device {
    Device::Cpu
}

mod absolute_difference_tests {
    use super::*;

    #[test]
    fn test_symmetry() {
        let a = Tensor::new(&[[1.0f32, -2.0, 3.5], [0.0, 4.0, -1.0]], &device()).expect("a");
        let b = Tensor::new(&[[2.0f32, 2.0, -3.5], [1.0, -4.0, 0.5]], &device()).expect("b");

        let ab = absolute_difference(&a, &b).expect("|a-b|");
        let ba = absolute_difference(&b, &a).expect("|b-a|");

        assert_eq!(
            ab.flatten_all().unwrap().to_vec1::<f32>().unwrap(),
            ba.flatten_all().unwrap().to_vec1::<f32>().unwrap(),
        );
    }

    #[test]
    fn test_identical_inputs_give_zero() {
        let a = Tensor::new(&[[1.5f32, -0.25, 7.0]], &device()).expect("a");
        let diff = absolute_difference(&a, &a).expect("|a-a|");

        let values = diff.flatten_all().unwrap().to_vec1::<f32>().unwrap();
        assert!(values.iter().all(|v| *v == 0.0), "got {:?}", values);
    }

    #[test]
    fn test_values_are_non_negative() {
        let a = Tensor::new(&[[-3.0f32, 2.0], [5.0, -8.0]], &device()).expect("a");
        let b = Tensor::new(&[[4.0f32, -2.0], [-5.0, 8.0]], &device()).expect("b");

        let diff = absolute_difference(&a, &b).expect("diff");
        let values = diff.flatten_all().unwrap().to_vec1::<f32>().unwrap();
        assert!(values.iter().all(|v| *v >= 0.0), "got {:?}", values);
    }

    #[test]
    fn test_preserves_shape() {
        let a = Tensor::ones((4, 128), DType::F32, &device()).expect("a");
        let b = Tensor::zeros((4, 128), DType::F32, &device()).expect("b");

        let diff = absolute_difference(&a, &b).expect("diff");
        assert_eq!(diff.dims(), &[4, 128]);
    }

    #[test]
    fn test_mismatched_shapes_fail() {
        let a = Tensor::ones((2, 8), DType::F32, &device()).expect("a");
        let b = Tensor::ones((3, 8), DType::F32, &device()).expect("b");
        assert!(absolute_difference(&a, &b).is_err());
    }
}

mod registry_tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_builtins_resolve_by_name() {
        register_builtin_ops();
        assert!(is_registered(ABSOLUTE_DIFFERENCE));

        let op = resolve_merge_op(ABSOLUTE_DIFFERENCE).expect("resolve");
        let a = Tensor::new(&[1.0f32, 5.0], &device()).expect("a");
        let b = Tensor::new(&[3.0f32, 2.0], &device()).expect("b");
        let diff = op(&a, &b).expect("apply");
        assert_eq!(diff.to_vec1::<f32>().unwrap(), vec![2.0, 3.0]);
    }

    #[test]
    #[serial]
    fn test_unregistered_name_does_not_resolve() {
        assert!(resolve_merge_op("no_such_op").is_none());
        assert!(!is_registered("no_such_op"));
    }

    #[test]
    #[serial]
    fn test_unregister_removes_entry() {
        register_merge_op("ephemeral_op", absolute_difference);
        assert!(is_registered("ephemeral_op"));
        assert!(unregister_merge_op("ephemeral_op"));
        assert!(!is_registered("ephemeral_op"));
        assert!(!unregister_merge_op("ephemeral_op"));
    }

    #[test]
    #[serial]
    fn test_register_builtin_ops_is_idempotent() {
        register_builtin_ops();
        register_builtin_ops();
        assert!(is_registered(ABSOLUTE_DIFFERENCE));
    }
}
