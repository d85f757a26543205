//! End-to-end harness behavior

use ajustar::data::{Dataset, InMemoryDataset};
use ajustar::nn::{Mlp, Module};
use ajustar::optim::{Adam, AdamW, LRScheduler, StepDecayLR, SGD};
use ajustar::train::{
    CallbackAction, CallbackContext, CrossEntropyLoss, FitConfig, Model, TrainerCallback,
};
use ajustar::{Error, Tensor};
use tempfile::tempdir;

/// Two well-separated 2-D clusters, alternating labels
fn blobs(n: usize) -> InMemoryDataset {
    let rows: Vec<Vec<f32>> = (0..n)
        .map(|i| {
            let jitter = (i as f32 * 0.37).sin() * 0.1;
            if i % 2 == 0 {
                vec![1.0 + jitter, 1.0 - jitter]
            } else {
                vec![-1.0 - jitter, -1.0 + jitter]
            }
        })
        .collect();
    let labels: Vec<usize> = (0..n).map(|i| i % 2).collect();
    InMemoryDataset::new(rows, labels).unwrap()
}

fn config() -> FitConfig {
    FitConfig::new().with_batch_size(8).with_seed(123).with_verbose(false)
}

fn compiled_model() -> Model<Mlp> {
    let mut model = Model::new(Mlp::new(&[2, 8, 2], 0.0, 42), config());
    model.compile(Box::new(CrossEntropyLoss), Box::new(SGD::new(0.05, 0.9)));
    model
}

#[test]
fn fit_returns_one_record_per_epoch_in_order() {
    let dataset = blobs(40);
    for epochs in [1usize, 3, 7] {
        let mut model = compiled_model();
        let history = model.fit(&dataset, None, None, epochs).unwrap();
        assert_eq!(history.len(), epochs);
        let recorded: Vec<usize> = history.records().iter().map(|r| r.epoch).collect();
        let expected: Vec<usize> = (1..=epochs).collect();
        assert_eq!(recorded, expected);
    }
}

#[test]
fn fit_without_compile_fails() {
    let dataset = blobs(10);
    let mut model = Model::new(Mlp::new(&[2, 8, 2], 0.0, 42), config());
    assert!(matches!(model.fit(&dataset, None, None, 1), Err(Error::NotCompiled)));
}

#[test]
fn fit_on_empty_dataset_fails() {
    let empty = InMemoryDataset::empty(2);
    let mut model = compiled_model();
    assert!(matches!(model.fit(&empty, None, None, 1), Err(Error::EmptyDataset)));
}

#[test]
fn fit_with_empty_validation_set_fails() {
    let dataset = blobs(10);
    let empty = InMemoryDataset::empty(2);
    let mut model = compiled_model();
    assert!(matches!(
        model.fit(&dataset, Some(&empty), None, 1),
        Err(Error::EmptyDataset)
    ));
}

#[test]
fn evaluate_on_empty_dataset_fails() {
    let empty = InMemoryDataset::empty(2);
    let mut model = compiled_model();
    assert!(matches!(model.evaluate(&empty), Err(Error::EmptyDataset)));
}

#[test]
fn evaluate_without_compile_fails() {
    let dataset = blobs(10);
    let mut model = Model::new(Mlp::new(&[2, 8, 2], 0.0, 42), config());
    assert!(matches!(model.evaluate(&dataset), Err(Error::NotCompiled)));
}

#[test]
fn training_reduces_loss_on_separable_data() {
    let dataset = blobs(64);
    let mut model = compiled_model();
    let history = model.fit(&dataset, None, None, 20).unwrap();

    let first = &history.records()[0];
    let last = history.last().unwrap();
    assert!(
        last.train_loss < first.train_loss,
        "loss did not improve: {} -> {}",
        first.train_loss,
        last.train_loss
    );

    let (loss, acc) = model.evaluate(&dataset).unwrap();
    assert!(loss.is_finite());
    assert!(acc > 0.9, "accuracy {acc} too low for separable clusters");
}

#[test]
fn accuracy_always_within_unit_interval() {
    let dataset = blobs(100);
    let mut model = compiled_model();
    let history = model.fit(&dataset, Some(&dataset), None, 2).unwrap();

    for record in history.records() {
        assert!((0.0..=1.0).contains(&record.train_acc));
        let val_acc = record.val_acc.unwrap();
        assert!((0.0..=1.0).contains(&val_acc));
    }
}

#[test]
fn validation_phase_records_metrics_without_updates() {
    let train = blobs(40);
    let val = blobs(16);

    let mut model = compiled_model();
    let history = model.fit(&train, Some(&val), None, 3).unwrap();

    for record in history.records() {
        assert!(record.val_loss.is_some());
        assert!(record.val_acc.is_some());
        assert!(record.val_loss.unwrap().is_finite());
    }

    // A validation-only pass must not move parameters: evaluating twice
    // in a row yields identical results.
    let first = model.evaluate(&val).unwrap();
    let second = model.evaluate(&val).unwrap();
    assert_eq!(first, second);
}

#[test]
fn evaluate_is_deterministic_with_dropout_module() {
    let dataset = blobs(32);
    let mut model = Model::new(Mlp::new(&[2, 8, 2], 0.3, 42), config());
    model.compile(Box::new(CrossEntropyLoss), Box::new(Adam::default_params(0.01)));
    model.fit(&dataset, None, None, 2).unwrap();

    let first = model.evaluate(&dataset).unwrap();
    let second = model.evaluate(&dataset).unwrap();
    assert_eq!(first, second, "inference mode must be deterministic");
}

#[test]
fn scheduler_steps_once_per_epoch() {
    let dataset = blobs(20);
    let mut model = Model::new(Mlp::new(&[2, 8, 2], 0.0, 42), config());
    model.compile(Box::new(CrossEntropyLoss), Box::new(SGD::new(0.1, 0.0)));

    let mut scheduler = StepDecayLR::new(0.1, 2, 0.1);
    let history = model.fit(&dataset, None, Some(&mut scheduler), 4).unwrap();
    assert_eq!(history.len(), 4);

    // After 4 epochs the schedule has advanced 4 times: 0.1 -> 0.001
    assert!((scheduler.get_lr() - 0.001).abs() < 1e-7);
}

#[test]
fn scheduler_rate_reaches_optimizer_between_epochs() {
    struct LrProbe {
        seen: std::rc::Rc<std::cell::RefCell<Vec<f32>>>,
    }
    impl TrainerCallback for LrProbe {
        fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
            self.seen.borrow_mut().push(ctx.lr);
            CallbackAction::Continue
        }
    }

    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let dataset = blobs(20);
    let mut model = Model::new(Mlp::new(&[2, 8, 2], 0.0, 42), config());
    model.compile(Box::new(CrossEntropyLoss), Box::new(SGD::new(0.1, 0.0)));
    model.add_callback(LrProbe { seen: seen.clone() });

    let mut scheduler = StepDecayLR::new(0.1, 1, 0.5);
    model.fit(&dataset, None, Some(&mut scheduler), 3).unwrap();

    // Epoch-end lr reflects the post-validation schedule step
    let seen = seen.borrow();
    assert!((seen[0] - 0.05).abs() < 1e-7);
    assert!((seen[1] - 0.025).abs() < 1e-7);
    assert!((seen[2] - 0.0125).abs() < 1e-7);
}

#[test]
fn callback_stop_interrupts_without_partial_record() {
    struct StopImmediately;
    impl TrainerCallback for StopImmediately {
        fn on_step_end(&mut self, _ctx: &CallbackContext) -> CallbackAction {
            CallbackAction::Stop
        }
    }

    let dataset = blobs(40);
    let mut model = compiled_model();
    model.add_callback(StopImmediately);

    let history = model.fit(&dataset, None, None, 5).unwrap();
    // The interrupted first epoch appends nothing
    assert_eq!(history.len(), 0);
}

#[test]
fn callback_stop_after_epoch_keeps_completed_records() {
    struct StopAfterFirstEpoch;
    impl TrainerCallback for StopAfterFirstEpoch {
        fn on_epoch_end(&mut self, _ctx: &CallbackContext) -> CallbackAction {
            CallbackAction::Stop
        }
    }

    let dataset = blobs(40);
    let mut model = compiled_model();
    model.add_callback(StopAfterFirstEpoch);

    let history = model.fit(&dataset, None, None, 5).unwrap();
    assert_eq!(history.len(), 1);
}

#[test]
fn predict_dataset_preserves_length_and_order() {
    let dataset = blobs(37);
    let mut model = compiled_model();
    model.fit(&dataset, None, None, 5).unwrap();

    let (predictions, labels) = model.predict_dataset(&dataset).unwrap();
    assert_eq!(predictions.len(), dataset.len());
    assert_eq!(labels.len(), dataset.len());

    // Labels come back in original dataset order
    let expected: Vec<usize> = (0..dataset.len()).map(|i| dataset.get(i).1).collect();
    assert_eq!(labels, expected);
}

#[test]
fn predict_single_batch_matches_predict_dataset() {
    let dataset = blobs(12);
    let mut model = compiled_model();
    model.fit(&dataset, None, None, 5).unwrap();

    let mut flat = Vec::new();
    for i in 0..dataset.len() {
        flat.extend_from_slice(dataset.get(i).0);
    }
    let batch_preds = model.predict(&Tensor::from_vec(flat, false)).unwrap();
    let (dataset_preds, _) = model.predict_dataset(&dataset).unwrap();
    assert_eq!(batch_preds, dataset_preds);
}

#[test]
fn predict_rejects_misshaped_input() {
    let mut model = compiled_model();
    let input = Tensor::from_vec(vec![1.0, 2.0, 3.0], false);
    assert!(matches!(model.predict(&input), Err(Error::ShapeMismatch { .. })));
}

#[test]
fn save_load_round_trip_reproduces_predictions() {
    let dataset = blobs(32);
    let dir = tempdir().unwrap();
    let path = dir.path().join("digits.json");

    let mut model = compiled_model();
    model.fit(&dataset, None, None, 10).unwrap();
    let (original_preds, _) = model.predict_dataset(&dataset).unwrap();
    model.save(&path).unwrap();

    // Fresh module of identical architecture, different init seed
    let fresh = Mlp::new(&[2, 8, 2], 0.0, 777);
    let mut restored = Model::from_artifact(fresh, config(), &path).unwrap();
    let (restored_preds, _) = restored.predict_dataset(&dataset).unwrap();

    assert_eq!(original_preds, restored_preds);
}

#[test]
fn save_load_round_trip_preserves_values_exactly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weights.json");

    let model = compiled_model();
    model.save(&path).unwrap();

    let mut restored = Model::new(Mlp::new(&[2, 8, 2], 0.0, 999), config());
    restored.load_weights(&path).unwrap();

    let original_params = model.module().parameters();
    let restored_params = restored.module().parameters();
    for (a, b) in original_params.iter().zip(restored_params.iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.tensor.data(), b.tensor.data());
    }
}

#[test]
fn yaml_artifact_round_trips() {
    let dataset = blobs(16);
    let dir = tempdir().unwrap();
    let path = dir.path().join("digits.yaml");

    let mut model = compiled_model();
    model.fit(&dataset, None, None, 3).unwrap();
    let (original_preds, _) = model.predict_dataset(&dataset).unwrap();
    model.save(&path).unwrap();

    let mut restored =
        Model::from_artifact(Mlp::new(&[2, 8, 2], 0.0, 1), config(), &path).unwrap();
    let (restored_preds, _) = restored.predict_dataset(&dataset).unwrap();
    assert_eq!(original_preds, restored_preds);
}

#[test]
fn load_into_mismatched_architecture_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("digits.json");

    let model = compiled_model(); // [2, 8, 2]
    model.save(&path).unwrap();

    // Narrower hidden layer: parameter shapes differ
    let mut narrow = Model::new(Mlp::new(&[2, 4, 2], 0.0, 42), config());
    let err = narrow.load_weights(&path).unwrap_err();
    assert!(matches!(err, Error::StructuralMismatch(_)));
    assert!(err.to_string().contains("fc1.weight"));

    // Different depth: parameter sets differ
    let mut deep = Model::new(Mlp::new(&[2, 8, 8, 2], 0.0, 42), config());
    assert!(matches!(deep.load_weights(&path), Err(Error::StructuralMismatch(_))));
}

#[test]
fn load_missing_artifact_is_io_error() {
    let mut model = Model::new(Mlp::new(&[2, 8, 2], 0.0, 42), config());
    assert!(matches!(model.load_weights("/nonexistent/digits.json"), Err(Error::Io(_))));
}

#[test]
fn adamw_decays_weights_during_training() {
    let dataset = blobs(32);
    let mut model = Model::new(Mlp::new(&[2, 8, 2], 0.0, 42), config());
    model.compile(
        Box::new(CrossEntropyLoss),
        Box::new(AdamW::new(0.01, 0.9, 0.999, 1e-8, 0.001)),
    );
    let history = model.fit(&dataset, None, None, 5).unwrap();
    assert_eq!(history.len(), 5);
    assert!(history.last().unwrap().train_loss.is_finite());
}

#[test]
fn each_fit_call_records_its_own_run() {
    let dataset = blobs(20);
    let mut model = compiled_model();
    model.fit(&dataset, None, None, 2).unwrap();
    let history = model.fit(&dataset, None, None, 3).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(model.history().len(), 3);
}

#[test]
fn concrete_scenario_100_items_batch_32() {
    // 100 items, batch 32, 1 epoch: 4 batches (32, 32, 32, 4)
    use ajustar::train::{num_batches, BatchIterator};

    let dataset = blobs(100);
    assert_eq!(num_batches(dataset.len(), 32), 4);
    let sizes: Vec<usize> = BatchIterator::sequential(&dataset, 32).map(|b| b.size()).collect();
    assert_eq!(sizes, vec![32, 32, 32, 4]);

    let mut model = Model::new(
        Mlp::new(&[2, 8, 2], 0.0, 42),
        FitConfig::new().with_batch_size(32).with_verbose(false),
    );
    model.compile(Box::new(CrossEntropyLoss), Box::new(SGD::new(0.1, 0.0)));
    let history = model.fit(&dataset, None, None, 1).unwrap();

    assert_eq!(history.len(), 1);
    let record = history.last().unwrap();
    assert!((0.0..=1.0).contains(&record.train_acc));
}

#[test]
fn batch_size_larger_than_dataset_trains_one_batch_per_epoch() {
    let dataset = blobs(5);
    let mut model = Model::new(
        Mlp::new(&[2, 8, 2], 0.0, 42),
        FitConfig::new().with_batch_size(64).with_verbose(false),
    );
    model.compile(Box::new(CrossEntropyLoss), Box::new(SGD::new(0.1, 0.0)));
    let history = model.fit(&dataset, None, None, 2).unwrap();
    assert_eq!(history.len(), 2);
}

#[test]
fn gradient_clipping_keeps_training_stable() {
    let dataset = blobs(32);
    let mut model = Model::new(
        Mlp::new(&[2, 8, 2], 0.0, 42),
        FitConfig::new().with_batch_size(8).with_verbose(false).with_max_grad_norm(1.0),
    );
    model.compile(Box::new(CrossEntropyLoss), Box::new(SGD::new(0.5, 0.0)));
    let history = model.fit(&dataset, None, None, 5).unwrap();
    for record in history.records() {
        assert!(record.train_loss.is_finite());
    }
}

#[test]
fn optimizer_lr_survives_into_evaluate() {
    let dataset = blobs(16);
    let mut model = compiled_model();
    let mut scheduler = StepDecayLR::new(0.1, 1, 0.1);
    model.fit(&dataset, None, Some(&mut scheduler), 2).unwrap();

    // Evaluation after training still works with the decayed optimizer
    let (loss, acc) = model.evaluate(&dataset).unwrap();
    assert!(loss.is_finite());
    assert!((0.0..=1.0).contains(&acc));
}
