use crate::error::Result;
use caspolcheck::core::catalog::{builtin_model, builtin_model_names};
use caspolcheck::core::reference::table::ReferenceTable;
use std::io::{self, Write};

pub fn run() -> Result<bool> {
    write_catalog(&mut io::stdout().lock())?;
    Ok(true)
}

fn write_catalog(w: &mut impl Write) -> io::Result<()> {
    writeln!(w, "Asymptotic models:")?;
    for name in builtin_model_names() {
        let Some(model) = builtin_model(name) else {
            continue;
        };
        let p = model.params();
        writeln!(
            w,
            "  {:<22} short-range z <= {}, long-range z >= {}, C_SR = {:e}, C_LR = {:e}",
            name, p.short_threshold, p.long_threshold, p.c_sr, p.c_lr
        )?;
    }

    let table = ReferenceTable::builtin();
    writeln!(w, "\nReference geometries:")?;
    for geometry in table.geometries() {
        writeln!(
            w,
            "  {:<22} {} points",
            geometry,
            table.keys_for(geometry).len()
        )?;
    }
    Ok(())
}
