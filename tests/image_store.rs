mod common;

use brief_pdf::view::{CAPTION_PLACEHOLDER, image_cards};
use brief_pdf::{Error, ImageId, ImageStore, UploadFile, decode_upload};

#[tokio::test]
async fn png_upload_gets_natural_dimensions() {
    let mut store = ImageStore::new();
    let file = UploadFile::from_bytes("grade.png", "image/png", common::png_bytes(400, 300));

    let id = store.add(file).await.unwrap().expect("image accepted");

    let record = store.get(id).unwrap();
    assert_eq!((record.pixel_width, record.pixel_height), (400, 300));
    assert_eq!(record.display_name, "grade.png");
    assert_eq!(record.caption, "");
}

#[tokio::test]
async fn non_image_files_are_silently_skipped() {
    let mut store = ImageStore::new();
    let file = UploadFile::from_bytes("notes.txt", "text/plain", b"warmer please".to_vec());

    assert!(store.add(file).await.unwrap().is_none());
    assert!(store.is_empty());
}

#[tokio::test]
async fn undecodable_image_creates_no_record() {
    let file = UploadFile::from_bytes("broken.png", "image/png", b"\x89PNG\r\n\x1a\ngarbage".to_vec());
    let err = decode_upload(file).await.unwrap_err();
    assert!(matches!(err, Error::Decode { ref name, .. } if name == "broken.png"));
}

#[tokio::test]
async fn truncated_image_with_readable_header_is_rejected() {
    let mut data = common::png_bytes(64, 64);
    // keep the signature and IHDR so the dimensions are still readable
    data.truncate(60);
    let mut store = ImageStore::new();

    let err = store
        .add(UploadFile::from_bytes("cut.png", "image/png", data))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { ref name, .. } if name == "cut.png"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn one_bad_file_does_not_abort_the_batch() {
    let mut store = ImageStore::new();
    let files = vec![
        UploadFile::from_bytes("a.png", "image/png", common::png_bytes(10, 10)),
        UploadFile::from_bytes("bad.jpg", "image/jpeg", vec![0xFF, 0xD8, 0x00]),
        UploadFile::from_bytes("readme.md", "text/markdown", b"# hi".to_vec()),
        UploadFile::from_bytes("b.jpg", "image/jpeg", common::jpeg_bytes(30, 20)),
        UploadFile::from_bytes("c.webp", "image/webp", common::webp_bytes(8, 16)),
    ];

    let added = store.add_batch(files).await;

    assert_eq!(added.len(), 3);
    let names: Vec<&str> = store.records().iter().map(|r| r.display_name.as_str()).collect();
    assert_eq!(names, vec!["a.png", "b.jpg", "c.webp"]);
}

#[tokio::test]
async fn path_uploads_infer_mime_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("still.png");
    let txt = dir.path().join("still.txt");
    std::fs::write(&png, common::png_bytes(12, 6)).unwrap();
    std::fs::write(&txt, b"not an image").unwrap();

    let png_file = UploadFile::from_path(&png);
    assert_eq!(png_file.mime_type, "image/png");
    assert!(!UploadFile::from_path(&txt).is_image());

    let mut store = ImageStore::new();
    let added = store
        .add_batch(vec![png_file, UploadFile::from_path(&txt)])
        .await;
    assert_eq!(added.len(), 1);
    assert_eq!(store.records()[0].pixel_width, 12);
}

#[tokio::test]
async fn missing_path_is_an_io_error() {
    let file = UploadFile::from_path("/nonexistent/dir/frame.png");
    assert!(matches!(decode_upload(file).await, Err(Error::Io(_))));
}

#[tokio::test]
async fn ids_are_unique_even_after_removal() {
    let mut store = ImageStore::new();
    let mut ids = Vec::new();
    for i in 0..3 {
        let file = UploadFile::from_bytes(format!("{i}.png"), "image/png", common::png_bytes(4, 4));
        ids.push(store.add(file).await.unwrap().unwrap());
    }
    store.remove(ids[2]);
    let file = UploadFile::from_bytes("3.png", "image/png", common::png_bytes(4, 4));
    let next = store.add(file).await.unwrap().unwrap();

    assert!(!ids.contains(&next));
    assert!(next > ids[2]);
}

#[test]
fn remove_is_idempotent() {
    let mut store = ImageStore::new();
    let id = store.publish(brief_pdf::DecodedUpload {
        name: "a.png".to_string(),
        mime_type: "image/png".to_string(),
        data: Vec::new(),
        pixel_width: 10,
        pixel_height: 10,
    });

    assert!(store.remove(id));
    assert!(!store.remove(id));
    assert!(!store.remove(ImageId(999)));
    assert!(store.is_empty());
}

#[test]
fn caption_edits_apply_in_place() {
    let mut store = ImageStore::new();
    let upload = brief_pdf::DecodedUpload {
        name: "a.png".to_string(),
        mime_type: "image/png".to_string(),
        data: vec![1, 2, 3],
        pixel_width: 10,
        pixel_height: 10,
    };
    let first = store.publish(upload.clone());
    let second = store.publish(upload);

    assert!(store.update_caption(second, "too warm"));
    assert!(!store.update_caption(ImageId(42), "ignored"));

    assert_eq!(store.get(first).unwrap().caption, "");
    assert_eq!(store.get(second).unwrap().caption, "too warm");

    let cards = image_cards(&store);
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[1].id, second);
    assert_eq!(cards[1].caption, "too warm");
    assert_eq!(cards[0].caption_placeholder, CAPTION_PLACEHOLDER);
    assert_eq!(cards[0].preview_src, "data:image/png;base64,AQID");
}
