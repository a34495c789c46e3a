#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use ov2640_snapshot_cam::core::CameraError;
    use ov2640_snapshot_cam::sim::{synthetic_capture, synthetic_jpeg, MemStorage};
    use ov2640_snapshot_cam::storage::{
        DirStorage, NameForm, PhotoName, PhotoStore, StorageError, StoreSettings,
    };

    // ヘルパー：メモリボリューム上のストアを作る（ボリュームの複製も返す）
    fn store_with(settings: StoreSettings) -> (PhotoStore<MemStorage>, MemStorage) {
        let storage = MemStorage::new();
        (PhotoStore::new(storage.clone(), settings), storage)
    }

    fn store() -> (PhotoStore<MemStorage>, MemStorage) {
        store_with(StoreSettings::default())
    }

    #[test]
    fn test_extracted_jpeg_is_saved_byte_exact() {
        let (mut store, storage) = store();
        let jpeg = synthetic_jpeg(5000);
        let capture = synthetic_capture(100, &jpeg, 4096);

        let saved = store.extract_and_save(&capture).unwrap();

        assert_eq!(saved.name.to_string(), "PHOTO_00000.jpeg");
        assert_eq!(saved.bytes_written, jpeg.len());
        assert_eq!(saved.sha256.len(), 64);
        assert_eq!(storage.file("PHOTO_00000.jpeg"), Some(jpeg));
        assert_eq!(storage.closed(), vec!["PHOTO_00000.jpeg".to_string()]);
    }

    #[test]
    fn test_missing_end_marker_creates_no_file() {
        let (mut store, storage) = store();
        let buffer = [0x00, 0x00, 0xFF, 0xD8, 0x01, 0x02, 0x03, 0x00];

        let result = store.extract_and_save(&buffer);
        assert!(matches!(result, Err(CameraError::NoEndMarker { start: 2 })));
        assert!(storage.names().is_empty());
    }

    #[test]
    fn test_missing_start_marker_creates_no_file() {
        let (mut store, storage) = store();
        let result = store.extract_and_save(&[0u8; 1024]);
        assert!(matches!(result, Err(CameraError::NoStartMarker)));
        assert!(storage.names().is_empty());
    }

    #[test]
    fn test_allocation_continues_after_highest_number() {
        let (mut store, storage) = store();
        for id in 0..5 {
            storage.insert(&PhotoName::new(id, NameForm::Long).to_string(), b"x");
        }
        storage.insert("README.TXT", b"");
        storage.insert("PHOTO_1.jpeg", b"");

        let saved = store.save(&synthetic_jpeg(10)).unwrap();
        assert_eq!(saved.name.to_string(), "PHOTO_00005.jpeg");
    }

    #[test]
    fn test_short_names_count_toward_highest_number() {
        let (mut store, storage) = store();
        storage.insert("PHOTO_00003.jpeg", b"x");
        storage.insert("p00009.jpg", b"x");

        assert_eq!(store.allocate_name().unwrap(), PhotoName::new(10, NameForm::Long));
    }

    #[test]
    fn test_rejected_long_names_fall_back_to_short_form() {
        let (mut store, storage) = store();
        storage.set_reject_long_names(true);
        for id in 0..5 {
            storage.insert(&PhotoName::new(id, NameForm::Short).to_string(), b"x");
        }

        let jpeg = synthetic_jpeg(64);
        let saved = store.save(&jpeg).unwrap();
        assert_eq!(saved.name.to_string(), "P00005.JPG");
        assert_eq!(storage.file("P00005.JPG"), Some(jpeg));
    }

    #[test]
    fn test_numbering_wraps_after_99999() {
        let (mut store, storage) = store();
        storage.insert("PHOTO_99999.jpeg", b"x");
        assert_eq!(store.allocate_name().unwrap().to_string(), "PHOTO_00000.jpeg");
    }

    #[test]
    fn test_probe_limit_reports_no_free_name() {
        let (mut store, storage) = store_with(StoreSettings {
            probe_limit: 3,
            ..StoreSettings::default()
        });
        for name in [
            "PHOTO_99999.jpeg",
            "PHOTO_00000.jpeg",
            "PHOTO_00001.jpeg",
            "PHOTO_00002.jpeg",
        ] {
            storage.insert(name, b"x");
        }

        let result = store.save(&synthetic_jpeg(10));
        assert!(matches!(result, Err(CameraError::NoFreeName { attempts: 3 })));
    }

    #[test]
    fn test_name_created_by_someone_else_is_not_overwritten() {
        let (mut store, storage) = store();
        storage.add_racing_name("PHOTO_00000.jpeg");

        let result = store.save(&synthetic_jpeg(10));
        assert!(matches!(result, Err(CameraError::NameRace(ref name)) if name == "PHOTO_00000.jpeg"));
        assert!(storage.names().is_empty());
    }

    #[test]
    fn test_writes_are_chunked() {
        let (mut store, storage) = store_with(StoreSettings {
            write_chunk_bytes: 1000,
            ..StoreSettings::default()
        });
        let jpeg = synthetic_jpeg(2500);

        store.save(&jpeg).unwrap();
        assert_eq!(storage.write_calls(), vec![1000, 1000, 504]);
        assert_eq!(storage.file("PHOTO_00000.jpeg"), Some(jpeg));
    }

    #[test]
    fn test_short_writes_are_resumed() {
        let (mut store, storage) = store_with(StoreSettings {
            write_chunk_bytes: 1000,
            ..StoreSettings::default()
        });
        storage.set_max_write_bytes(Some(300));
        let jpeg = synthetic_jpeg(2500);

        let saved = store.save(&jpeg).unwrap();
        assert_eq!(saved.bytes_written, jpeg.len());
        assert!(storage.write_calls().iter().all(|&n| n <= 1000));
        assert_eq!(storage.file("PHOTO_00000.jpeg"), Some(jpeg));
    }

    #[test]
    fn test_stalled_write_is_an_error() {
        let (mut store, storage) = store();
        storage.set_stall_writes(true);
        let jpeg = synthetic_jpeg(100);

        let result = store.save(&jpeg);
        assert!(matches!(
            result,
            Err(CameraError::Storage(StorageError::WriteStalled { written: 0, expected: 104 }))
        ));
        // 書き込みに失敗してもハンドルは閉じられている
        assert_eq!(storage.closed(), vec!["PHOTO_00000.jpeg".to_string()]);
    }

    #[test]
    fn test_unmounted_volume_is_reported() {
        let (mut store, storage) = store();
        storage.set_mounted(false);

        let result = store.save(&synthetic_jpeg(10));
        assert!(matches!(
            result,
            Err(CameraError::Storage(StorageError::NotMounted(_)))
        ));
        assert_eq!(
            CameraError::Storage(StorageError::NotMounted(String::new())).status_text(),
            "SD mount failed"
        );
    }

    // ヘルパー：テストごとの一時ディレクトリ
    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "ov2640_snapshot_cam_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_dir_storage_saves_sequential_files() {
        let dir = temp_dir("sequential");
        let mut store = PhotoStore::new(DirStorage::new(&dir), StoreSettings::default());
        fs::write(dir.join("PHOTO_00041.jpeg"), b"old").unwrap();

        let first = synthetic_jpeg(3000);
        let second = synthetic_jpeg(10);
        let a = store.save(&first).unwrap();
        let b = store.save(&second).unwrap();

        assert_eq!(a.name.to_string(), "PHOTO_00042.jpeg");
        assert_eq!(b.name.to_string(), "PHOTO_00043.jpeg");
        assert_eq!(fs::read(dir.join("PHOTO_00042.jpeg")).unwrap(), first);
        assert_eq!(fs::read(dir.join("PHOTO_00043.jpeg")).unwrap(), second);
        assert_eq!(fs::read(dir.join("PHOTO_00041.jpeg")).unwrap(), b"old");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_dir_storage_with_short_names_only() {
        let dir = temp_dir("short_names");
        let storage = DirStorage::new(&dir).with_short_names_only(true);
        let mut store = PhotoStore::new(storage, StoreSettings::default());

        let saved = store.save(&synthetic_jpeg(10)).unwrap();
        assert_eq!(saved.name.to_string(), "P00000.JPG");
        assert!(dir.join("P00000.JPG").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_dir_storage_missing_root_is_not_mounted() {
        let dir = std::env::temp_dir().join(format!(
            "ov2640_snapshot_cam_missing_{}",
            std::process::id()
        ));
        let mut store = PhotoStore::new(DirStorage::new(&dir), StoreSettings::default());
        let result = store.save(&synthetic_jpeg(10));
        assert!(matches!(
            result,
            Err(CameraError::Storage(StorageError::NotMounted(_)))
        ));
    }
}
