use core::{arch::global_asm, panic::PanicInfo};

use crate::main;

// Cartridge entry. The 188 header bytes after the branch are filled in by
// the ROM fixer (logo, title, checksum).
global_asm!(
    r#"
    .section .text.header, "ax"
    .global __start
    .arm
__start:
    b 1f
    .space 188
1:
    mov r0, #0x12
    msr CPSR_c, r0
    ldr sp, =0x03007FA0
    mov r0, #0x1F
    msr CPSR_c, r0
    ldr sp, =0x03007F00
    ldr r0, =__boot
    bx r0
    .ltorg
"#
);

#[panic_handler]
fn panic(info: &PanicInfo<'_>) -> ! {
    log::error!("{info}");
    loop {}
}

unsafe extern "C" {
    unsafe static __data_load: u8;
    unsafe static mut __data_start: u8;
    unsafe static mut __data_end: u8;

    unsafe static mut __bss_start: u8;
    unsafe static mut __bss_end: u8;
}

#[inline(always)]
unsafe fn init_data_and_bss() {
    unsafe {
        // Copy .data from ROM to IWRAM
        let mut src = &raw const __data_load;
        let mut dst = &raw mut __data_start;
        let end = &raw mut __data_end;
        while dst < end {
            dst.write_volatile(src.read_volatile());
            src = src.add(1);
            dst = dst.add(1);
        }

        // Zero .bss
        let mut bss = &raw mut __bss_start;
        let bss_end = &raw mut __bss_end;
        while bss < bss_end {
            bss.write_volatile(0);
            bss = bss.add(1);
        }
    }
}

#[unsafe(no_mangle)]
unsafe extern "C" fn __boot() -> ! {
    unsafe { init_data_and_bss() };
    main()
}
