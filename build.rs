fn main() {
    #[cfg(target_os = "windows")]
    {
        let mut res = winres::WindowsResource::new();
        res.set("FileDescription", "Rusty Climate – GISS Temperature Viewer");
        res.set("ProductName", "Rusty Climate");
        res.compile().expect("Failed to compile Windows resources");
    }
}
