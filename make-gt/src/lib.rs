//! The ground-truth generation program.

mod common;
pub mod config;
pub mod output;

use crate::{common::*, config::Config, output::BatchOutput};

/// Records of one batch and, optionally, their decoded images.
#[derive(Debug)]
struct BatchInput {
    index: usize,
    records: Vec<AnnotationRecord>,
    images: Option<Array4<f32>>,
}

/// The entry of the program.
pub async fn start(config: Arc<Config>) -> Result<()> {
    let start_time = Local::now();
    let output_dir: Arc<Path> = {
        let dir = config
            .output
            .dir
            .join(format!("{}", start_time.format(output::FILE_STRFTIME)));
        dir.into_boxed_path().into()
    };

    // create dirs and save config
    {
        tokio::fs::create_dir_all(&*output_dir).await?;
        let path = output_dir.join("config.json5");
        let text = serde_json::to_string_pretty(&*config)?;
        tokio::fs::write(&path, text).await?;
    }

    // default boxes
    let default_boxes = config
        .anchors
        .prior
        .generate(&config.anchors.feature_maps)?;
    info!("generated {} default boxes", default_boxes.len());

    let matching = Arc::new(config.matching.clone());
    let cancel = Arc::new(AtomicBool::new(false));
    let builder =
        GroundTruthBuilder::new(matching.clone(), default_boxes)?.with_cancel_flag(cancel.clone());

    // stop on Ctrl-C
    let signal_task = {
        let cancel = cancel.clone();
        tokio::task::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, cancelling the pending batch");
                cancel.store(true, Ordering::SeqCst);
            }
        })
    };

    // load annotations
    let annotation_file = &config.dataset.annotation_file;
    let lines = {
        let text = tokio::fs::read_to_string(annotation_file)
            .await
            .with_context(|| {
                format!(
                    "failed to read annotation file '{}'",
                    annotation_file.display()
                )
            })?;
        AnnotationLine::enumerate(&text)
    };
    info!(
        "loaded {} annotations from '{}'",
        lines.len(),
        annotation_file.display()
    );

    let (data_tx, mut data_rx) = mpsc::channel(config.pipeline.prefetch.get());

    // reading worker
    let reading_future = {
        let reader = AnnotationReader::new(matching.clone(), ResizePreprocessor::new(&matching))?;
        let batch_size = config.pipeline.batch_size.get();
        let load_images = config.dataset.load_images;
        let cancel = cancel.clone();

        tokio::task::spawn(async move {
            for (index, chunk) in lines.chunks(batch_size).enumerate() {
                if cancel.load(Ordering::SeqCst) {
                    break;
                }

                let input = if load_images {
                    let batch = reader.read(chunk).await?;
                    BatchInput {
                        index,
                        records: batch.records,
                        images: Some(batch.images),
                    }
                } else {
                    BatchInput {
                        index,
                        records: reader.parse(chunk)?,
                        images: None,
                    }
                };

                if data_tx.send(input).await.is_err() {
                    break;
                }
            }

            Fallible::Ok(())
        })
        .map(|result| Fallible::Ok(result??))
    };

    // matching worker
    let matching_future = {
        let output_dir = output_dir.clone();

        tokio::task::spawn(async move {
            let mut num_batches = 0;

            while let Some(input) = data_rx.recv().await {
                let BatchInput {
                    index,
                    records,
                    images,
                } = input;

                let targets = builder
                    .build(&records)
                    .instrument(info_span!("build_batch", index))
                    .await?;
                let positives = targets.num_positives();
                info!(
                    "batch {}: {} images, {} positive anchors",
                    index,
                    records.len(),
                    positives.iter().sum::<usize>()
                );
                debug!("positive anchors per image {:?}", positives);

                let path = BatchOutput::new(index, &records, &targets, images.as_ref())
                    .save(&output_dir)
                    .await?;
                debug!("saved '{}'", path.display());
                num_batches += 1;
            }

            Fallible::Ok(num_batches)
        })
        .map(|result| Fallible::Ok(result??))
    };

    let result = futures::try_join!(reading_future, matching_future);
    signal_task.abort();
    let ((), num_batches) = result?;

    if cancel.load(Ordering::SeqCst) {
        return Err(format_err!("cancelled after {} batches", num_batches));
    }
    info!(
        "wrote {} batches to '{}'",
        num_batches,
        output_dir.display()
    );

    Ok(())
}
