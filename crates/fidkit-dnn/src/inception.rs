//! # InceptionV3
//!
//! Pooled InceptionV3 embeddings computed with the onnx runtime.
//!
//! The model is expected to take a `[N, 299, 299, 3]` (or `[N, 3, 299, 299]`) float tensor
//! normalized to `[-1, 1]` and to output the 2048-d global-average-pooled activations.

use std::path::PathBuf;

use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;

use fidkit_image::{ImageBatch, ImageSize};
use fidkit_tensor::Tensor2;

use crate::{
    error::DnnError,
    extractor::{check_input, FeatureExtractor},
};

/// Side length of the InceptionV3 input.
pub const INCEPTION_INPUT_SIDE: usize = 299;

/// Length of the pooled InceptionV3 embedding.
pub const INCEPTION_EMBEDDING_DIM: usize = 2048;

/// Memory layout of the model input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputLayout {
    /// Batch, height, width, channels.
    #[default]
    Nhwc,
    /// Batch, channels, height, width.
    Nchw,
}

/// Builder for the InceptionV3 extractor.
pub struct InceptionV3Builder {
    /// Path to the onnx model file.
    pub model_path: PathBuf,
    /// Number of threads to use for inference.
    pub num_threads: usize,
    /// Memory layout of the model input.
    pub layout: InputLayout,
}

impl InceptionV3Builder {
    /// Creates a new `InceptionV3Builder` with default settings.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path to the onnx model file.
    pub fn new(model_path: PathBuf) -> Result<Self, DnnError> {
        Ok(Self {
            model_path,
            num_threads: 4,
            layout: InputLayout::default(),
        })
    }

    /// Sets the number of threads to use for inference.
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Sets the memory layout of the model input.
    pub fn with_layout(mut self, layout: InputLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Builds and returns an `InceptionV3` instance.
    pub fn build(self) -> Result<InceptionV3, DnnError> {
        InceptionV3::new(self.model_path, self.num_threads, self.layout)
    }
}

/// InceptionV3 feature extractor.
pub struct InceptionV3 {
    session: Session,
    input_name: String,
    layout: InputLayout,
}

impl InceptionV3 {
    /// Creates a new `InceptionV3` instance.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path to the onnx model file.
    /// * `num_threads` - Number of threads to use for inference.
    /// * `layout` - Memory layout of the model input.
    ///
    /// Pre-requisites:
    /// - ORT_DYLIB_PATH environment variable must be set to the path of the ORT dylib.
    pub fn new(model_path: PathBuf, num_threads: usize, layout: InputLayout) -> Result<Self, DnnError> {
        // get the ort dylib path from the environment variable
        let dylib_path =
            std::env::var("ORT_DYLIB_PATH").map_err(|e| DnnError::OrtDylibError(e.to_string()))?;

        // set the ort dylib path
        ort::init_from(dylib_path).commit()?;

        // create the ort session
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(num_threads)?
            .commit_from_file(&model_path)?;

        let input_name = session
            .inputs
            .first()
            .map(|x| x.name.to_string())
            .ok_or_else(|| DnnError::InvalidConfig("the model declares no inputs".to_string()))?;

        log::debug!(
            "loaded InceptionV3 from {} with input '{}' ({:?})",
            model_path.display(),
            input_name,
            layout
        );

        Ok(Self {
            session,
            input_name,
            layout,
        })
    }

    fn to_input_tensor(&self, batch: &ImageBatch) -> ([usize; 4], Vec<f32>) {
        let [n, h, w, c] = batch.shape;
        match self.layout {
            InputLayout::Nhwc => ([n, h, w, c], batch.as_slice().to_vec()),
            InputLayout::Nchw => ([n, c, h, w], nhwc_to_nchw(batch)),
        }
    }
}

/// Copy a batch into a planar `[N, C, H, W]` buffer.
fn nhwc_to_nchw(batch: &ImageBatch) -> Vec<f32> {
    let plane = batch.size().width * batch.size().height;
    let c = batch.num_channels();
    let src = batch.as_slice();
    let mut dst = vec![0.0f32; src.len()];
    for (image_src, image_dst) in src
        .chunks_exact(batch.image_numel())
        .zip(dst.chunks_exact_mut(batch.image_numel()))
    {
        for (i, pixel) in image_src.chunks_exact(c).enumerate() {
            for (k, &v) in pixel.iter().enumerate() {
                image_dst[k * plane + i] = v;
            }
        }
    }
    dst
}

impl FeatureExtractor for InceptionV3 {
    fn input_size(&self) -> ImageSize {
        ImageSize {
            width: INCEPTION_INPUT_SIDE,
            height: INCEPTION_INPUT_SIDE,
        }
    }

    fn embedding_dim(&self) -> usize {
        INCEPTION_EMBEDDING_DIM
    }

    fn extract(&self, batch: &ImageBatch) -> Result<Tensor2<f32>, DnnError> {
        check_input(self, batch)?;

        let num_images = batch.num_images();
        let (shape, data) = self.to_input_tensor(batch);

        // make the ort tensor
        let ort_tensor = ort::value::Tensor::from_array((shape, data))?;

        // run the model
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.clone() => ort_tensor]?)?;

        // extract the output tensor
        let (out_shape, out_ort) = outputs[0].try_extract_raw_tensor::<f32>()?;

        // accept [N, 2048] as well as [N, 1, 1, 2048] or [N, 2048, 1, 1]
        if out_ort.len() != num_images * INCEPTION_EMBEDDING_DIM
            || out_shape.first().copied() != Some(num_images as i64)
        {
            return Err(DnnError::InvalidOutputShape {
                shape: out_shape,
                num_images,
                embedding_dim: INCEPTION_EMBEDDING_DIM,
            });
        }

        let features =
            Tensor2::from_shape_vec([num_images, INCEPTION_EMBEDDING_DIM], out_ort.to_vec())?;

        Ok(features)
    }
}
