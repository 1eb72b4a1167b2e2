use sprocket_edge::BoundingRegion;
use sprocket_edge::models::OwnedFrame;
use sprocket_edge::tools::{
    bench_limit_from_env, dataset_iter, dataset_root_from_env, load_frame, parse_box_labels,
    smoke_from_env,
};

/// Frames and boxes from `SPROCKET_DATASET_DIR`, empty when the directory has no labels
pub fn load_dataset_frames() -> Vec<(OwnedFrame, BoundingRegion)> {
    let root = dataset_root_from_env();
    let limit = bench_limit_from_env();
    let smoke = smoke_from_env();

    let labels = match parse_box_labels(root.join("boxes.txt")) {
        Ok(labels) => labels,
        Err(_) => return Vec::new(),
    };
    dataset_iter(&root, limit, smoke)
        .zip(labels)
        .filter_map(|(path, (bbox, _))| load_frame(&path).ok().map(|frame| (frame, bbox)))
        .collect()
}
