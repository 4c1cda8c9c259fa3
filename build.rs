extern crate winres;

fn main() {
    if cfg!(target_os = "windows") {
        let mut res = winres::WindowsResource::new();
        res.set("ProductName", "portapps");
        res.set("FileDescription", "Portable application release helper");
        res.compile().unwrap();
    }
}
