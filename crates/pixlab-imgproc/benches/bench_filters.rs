use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pixlab_image::Image;
use pixlab_imgproc::filter::{box_blur, gaussian_blur, median_blur};

use image::GrayImage;
use imageproc::filter::{box_filter, gaussian_blur_f32, median_filter};

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("Smoothing");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        for radius in [1usize, 3, 7].iter() {
            let kernel_size = 2 * radius + 1;
            group.throughput(criterion::Throughput::Elements(
                (*width * *height * kernel_size) as u64,
            ));

            let parameter_string = format!("{}x{}x{}", width, height, radius);

            // input image
            let image_data = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
            let image_size = [*width, *height].into();
            let image = Image::<u8, 3>::new(image_size, image_data).unwrap();
            let output = Image::<u8, 3>::from_size_val(image_size, 0).unwrap();

            let gray = GrayImage::from_fn(*width as u32, *height as u32, |x, y| {
                image::Luma([((x + y) % 251) as u8])
            });

            group.bench_with_input(
                BenchmarkId::new("box_blur", &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(box_blur(src, &mut dst, (kernel_size, kernel_size))))
                },
            );

            group.bench_with_input(
                BenchmarkId::new("gaussian_blur", &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    let sigma = *radius as f32 / 2.0;
                    b.iter(|| {
                        black_box(gaussian_blur(
                            src,
                            &mut dst,
                            (kernel_size, kernel_size),
                            (sigma, sigma),
                        ))
                    })
                },
            );

            group.bench_with_input(
                BenchmarkId::new("median_blur", &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(median_blur(src, &mut dst, *radius)))
                },
            );

            group.bench_with_input(
                BenchmarkId::new("box_filter_imageproc", &parameter_string),
                &gray,
                |b, i| b.iter(|| black_box(box_filter(i, *radius as u32, *radius as u32))),
            );

            group.bench_with_input(
                BenchmarkId::new("gaussian_blur_imageproc", &parameter_string),
                &gray,
                |b, i| {
                    let sigma = *radius as f32 / 2.0;
                    b.iter(|| black_box(gaussian_blur_f32(i, sigma)))
                },
            );

            group.bench_with_input(
                BenchmarkId::new("median_filter_imageproc", &parameter_string),
                &gray,
                |b, i| b.iter(|| black_box(median_filter(i, *radius as u32, *radius as u32))),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_filters);
criterion_main!(benches);
