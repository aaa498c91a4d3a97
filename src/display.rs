//! 800x480 parallel RGB panel driven through the ESP-IDF `esp_lcd` RGB driver.

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::framebuffer::Framebuffer;
use anyhow::{Result, anyhow, ensure};
use esp_idf_svc::hal::gpio::{Gpio2, Output, PinDriver};
use esp_idf_svc::sys;
use log::info;

const PCLK_HZ: u32 = 15_000_000;

const PIN_DE: i32 = 41;
const PIN_VSYNC: i32 = 40;
const PIN_HSYNC: i32 = 39;
const PIN_PCLK: i32 = 0;

// B0..B4, G0..G5, R0..R4
const PIN_DATA: [i32; 16] = [15, 7, 6, 5, 4, 9, 46, 3, 8, 16, 1, 14, 21, 47, 48, 45];

fn esp_check(res: sys::esp_err_t, msg: &str) -> Result<()> {
    if res != sys::ESP_OK {
        Err(anyhow!("‼️ {} failed (err {})", msg, res))
    } else {
        Ok(())
    }
}

pub struct Display {
    panel: sys::esp_lcd_panel_handle_t,
    _backlight: PinDriver<'static, Gpio2, Output>,
}

impl Display {
    /// Brings up the RGB panel with its frame buffer in PSRAM, then lights the backlight.
    pub fn new(backlight: Gpio2) -> Result<Self> {
        let mut config = sys::esp_lcd_rgb_panel_config_t::default();
        config.clk_src = sys::soc_periph_lcd_clk_src_t_LCD_CLK_SRC_DEFAULT;
        config.data_width = 16;
        config.bits_per_pixel = 16;
        config.num_fbs = 1;
        config.de_gpio_num = PIN_DE;
        config.vsync_gpio_num = PIN_VSYNC;
        config.hsync_gpio_num = PIN_HSYNC;
        config.pclk_gpio_num = PIN_PCLK;
        config.disp_gpio_num = -1;
        config.data_gpio_nums[..PIN_DATA.len()].copy_from_slice(&PIN_DATA);
        config.flags.set_fb_in_psram(1);

        let timings = &mut config.timings;
        timings.pclk_hz = PCLK_HZ;
        timings.h_res = SCREEN_WIDTH;
        timings.v_res = SCREEN_HEIGHT;
        timings.hsync_front_porch = 40;
        timings.hsync_pulse_width = 48;
        timings.hsync_back_porch = 40;
        timings.vsync_front_porch = 1;
        timings.vsync_pulse_width = 31;
        timings.vsync_back_porch = 13;
        timings.flags.set_pclk_active_neg(1);

        let mut panel: sys::esp_lcd_panel_handle_t = std::ptr::null_mut();
        esp_check(
            unsafe { sys::esp_lcd_new_rgb_panel(&config, &mut panel) },
            "esp_lcd_new_rgb_panel",
        )?;
        esp_check(unsafe { sys::esp_lcd_panel_reset(panel) }, "esp_lcd_panel_reset")?;
        esp_check(unsafe { sys::esp_lcd_panel_init(panel) }, "esp_lcd_panel_init")?;

        let mut backlight = PinDriver::output(backlight)?;
        backlight.set_high()?;

        info!("\x1b[38;5;27m🖥️  RGB panel up: {}x{}\x1b[0m", SCREEN_WIDTH, SCREEN_HEIGHT);

        Ok(Self {
            panel,
            _backlight: backlight,
        })
    }

    /// Copies a full frame into the panel's frame buffer.
    pub fn flush(&mut self, frame: &Framebuffer) -> Result<()> {
        ensure!(
            frame.width() == SCREEN_WIDTH && frame.height() == SCREEN_HEIGHT,
            "frame is {}x{}, panel is {}x{}",
            frame.width(),
            frame.height(),
            SCREEN_WIDTH,
            SCREEN_HEIGHT
        );

        esp_check(
            unsafe {
                sys::esp_lcd_panel_draw_bitmap(
                    self.panel,
                    0,
                    0,
                    SCREEN_WIDTH as i32,
                    SCREEN_HEIGHT as i32,
                    frame.pixels().as_ptr().cast(),
                )
            },
            "esp_lcd_panel_draw_bitmap",
        )
    }
}
