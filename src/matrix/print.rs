use std::fmt;

use crate::matrix::Matrix;

/// 单行超过该列数时，中间部分用省略号代替
const MAX_DISPLAY_COLS: usize = 8;

impl Matrix {
    pub fn print(&self) {
        println!("{self}");
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (rows, cols) = self.shape();
        write!(f, "[")?;
        for r in 0..rows {
            if r != 0 {
                write!(f, ",\n ")?;
            }
            write!(f, "[")?;
            for c in 0..cols {
                if cols > MAX_DISPLAY_COLS && c >= MAX_DISPLAY_COLS / 2 && c < cols - MAX_DISPLAY_COLS / 2 {
                    if c == MAX_DISPLAY_COLS / 2 {
                        write!(f, ",      ...")?;
                    }
                    continue;
                }
                if c != 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:8.4}", self.get(r, c))?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")?;
        writeln!(f, "\n形状: [{rows}, {cols}]")
    }
}
