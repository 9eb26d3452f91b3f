use std::fs::File;
use std::io::Error;
use std::path::Path;

pub fn generate_ops_csv(path: &Path, submissions: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["op", "caller", "id", "amount", "link", "description"])?;

    for i in 0..submissions {
        let participant = format!("participant-{}", i % 50);
        let link = format!("github.com/{participant}/entry-{i}");
        wtr.write_record([
            "submit",
            &participant,
            "",
            "",
            &link,
            "generated entry",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn generate_large_ops_csv(path: &Path, size_mb: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(["op", "caller", "id", "amount", "link", "description"])?;

    let target_size = (size_mb * 1024 * 1024) as u64;
    let mut row = 0usize;

    // Check size every 5000 rows to avoid syscall overhead
    loop {
        for _ in 0..5000 {
            if row % 100 == 0 {
                wtr.write_record(["fund", "backer", "", "1.0", "", ""])?;
            } else {
                let participant = format!("participant-{}", row % 50);
                let link = format!("github.com/{participant}/entry-{row}");
                wtr.write_record(["submit", &participant, "", "", &link, ""])?;
            }
            row += 1;
        }
        wtr.flush()?; // Flush to ensure file size is updated
        if std::fs::metadata(path)?.len() >= target_size {
            break;
        }
    }
    Ok(())
}
